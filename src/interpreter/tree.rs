use super::{
    environment::Environment,
    error::{RuntimeError, RuntimeErrorKind},
    expression::ExpressionEvaluator,
};
use crate::{
    lexer::Span,
    machine::InstructionEvaluator,
    parser::{
        expression::ExpressionRef,
        statement::{
            Assignment, ForStatement, IfStatement, Statement, SwitchStatement, VariableDeclaration,
        },
        BlockRef, Program,
    },
    string::IdentName,
    value::{is_truthy, Word},
};
use std::collections::HashMap;

/// Runs a whole program against a machine.
pub struct Interpreter<'prog, 'm, M: InstructionEvaluator + ?Sized> {
    program: &'prog Program,
    variables: HashMap<IdentName, Word>,
    machine: &'m mut M,
}

impl<'prog, 'm, M> Interpreter<'prog, 'm, M>
where
    M: InstructionEvaluator + ?Sized,
{
    pub fn new(program: &'prog Program, machine: &'m mut M) -> Self {
        Self {
            program,
            variables: HashMap::new(),
            machine,
        }
    }

    /// Variables that are visible to the whole program before it starts.
    pub fn with_variables<I, N>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (N, Word)>,
        N: Into<IdentName>,
    {
        self.variables
            .extend(variables.into_iter().map(|(name, value)| (name.into(), value)));
        self
    }

    pub fn run(self) -> Result<(), RuntimeError> {
        let program = self.program;
        let root = program.root();
        let mut environment = Environment::new();
        for (name, value) in self.variables.iter() {
            environment
                .bind(name, *value)
                .map_err(|kind| RuntimeError::new(kind, program[root].span))?;
        }
        let mut executor = StatementExecutor::new(program, environment, self.machine);
        executor.execute_block(root)
    }
}

/// Executes statements against one environment. Nested function calls create
/// their own executor that borrows the same machine.
pub struct StatementExecutor<'prog, 'outer, 'm, M: InstructionEvaluator + ?Sized> {
    program: &'prog Program,
    environment: Environment<'prog, 'outer>,
    machine: &'m mut M,
}

impl<'prog, 'outer, 'm, M> StatementExecutor<'prog, 'outer, 'm, M>
where
    M: InstructionEvaluator + ?Sized,
{
    pub fn new(
        program: &'prog Program,
        environment: Environment<'prog, 'outer>,
        machine: &'m mut M,
    ) -> Self {
        Self {
            program,
            environment,
            machine,
        }
    }

    pub fn into_environment(self) -> Environment<'prog, 'outer> {
        self.environment
    }

    fn evaluator(&mut self) -> ExpressionEvaluator<'prog, '_, '_, M> {
        ExpressionEvaluator::new(self.program, &self.environment, &mut *self.machine)
    }

    fn evaluate(&mut self, expr: ExpressionRef) -> Result<Word, RuntimeError> {
        self.evaluator().evaluate(expr)
    }

    fn evaluate_multi(&mut self, expr: ExpressionRef) -> Result<Vec<Word>, RuntimeError> {
        self.evaluator().evaluate_multi(expr)
    }

    /// Registers the functions defined directly in `statements` so that they
    /// can be called before their definition is reached.
    fn register_functions(&mut self, statements: &'prog [Statement]) -> Result<(), RuntimeError> {
        let program = self.program;
        for statement in statements.iter() {
            if let Statement::FunctionDefinition(function) = statement {
                let function = &program[*function];
                self.environment
                    .register_function(function)
                    .map_err(|kind| RuntimeError::new(kind, function.name.span))?;
            }
        }
        Ok(())
    }

    fn close_scope(&mut self, span: Span) -> Result<(), RuntimeError> {
        self.environment
            .close_scope()
            .map_err(|kind| RuntimeError::new(kind, span))
    }

    pub fn execute_block(&mut self, block: BlockRef) -> Result<(), RuntimeError> {
        let program = self.program;
        let block = &program[block];
        self.environment.open_scope();
        self.register_functions(&block.statements)?;
        for statement in block.statements.iter() {
            self.execute_statement(statement)?;
        }
        self.close_scope(block.span)
    }

    pub fn execute_statement(&mut self, statement: &'prog Statement) -> Result<(), RuntimeError> {
        tracing::trace!(?statement, "executing");
        match statement {
            Statement::Expression(statement) => {
                let _ = self.evaluate_multi(statement.expr)?;
                Ok(())
            }
            Statement::Assignment(assignment) => self.execute_assignment(assignment),
            Statement::VariableDeclaration(declaration) => {
                self.execute_variable_declaration(declaration)
            }
            Statement::If(statement) => self.execute_if(statement),
            Statement::Switch(statement) => self.execute_switch(statement),
            Statement::FunctionDefinition(_) => Ok(()),
            Statement::For(statement) => self.execute_for(statement),
            Statement::Block(block) => self.execute_block(*block),
        }
    }

    fn execute_assignment(&mut self, assignment: &Assignment) -> Result<(), RuntimeError> {
        let values = self.evaluate_multi(assignment.value)?;
        if values.len() != assignment.targets.len() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::ArityMismatch {
                    expected: assignment.targets.len(),
                    actual: values.len(),
                },
                assignment.span,
            ));
        }
        for (target, value) in assignment.targets.iter().zip(values) {
            self.environment
                .assign(&target.name, value)
                .map_err(|kind| RuntimeError::new(kind, target.span))?;
        }
        Ok(())
    }

    fn execute_variable_declaration(
        &mut self,
        declaration: &VariableDeclaration,
    ) -> Result<(), RuntimeError> {
        let values = match declaration.value {
            Some(value) => {
                let values = self.evaluate_multi(value)?;
                if values.len() != declaration.names.len() {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::ArityMismatch {
                            expected: declaration.names.len(),
                            actual: values.len(),
                        },
                        declaration.span,
                    ));
                }
                values
            }
            None => vec![Word::ZERO; declaration.names.len()],
        };
        for (name, value) in declaration.names.iter().zip(values) {
            self.environment
                .declare_variable(&name.name, value)
                .map_err(|kind| RuntimeError::new(kind, name.span))?;
        }
        Ok(())
    }

    fn execute_if(&mut self, statement: &IfStatement) -> Result<(), RuntimeError> {
        if is_truthy(&self.evaluate(statement.condition)?) {
            self.execute_block(statement.body)?;
        }
        Ok(())
    }

    /// Runs the first case whose guard equals the scrutinee. A case without a
    /// guard always matches.
    fn execute_switch(&mut self, statement: &SwitchStatement) -> Result<(), RuntimeError> {
        let value = self.evaluate(statement.scrutinee)?;
        for case in statement.cases.iter() {
            let matches = match case.guard {
                Some(guard) => self.evaluate(guard)? == value,
                None => true,
            };
            if matches {
                return self.execute_block(case.body);
            }
        }
        Ok(())
    }

    /// The initializer shares one scope with the whole loop, so variables it
    /// declares keep their values between iterations.
    fn execute_for(&mut self, statement: &ForStatement) -> Result<(), RuntimeError> {
        let program = self.program;
        let pre = &program[statement.pre];
        self.environment.open_scope();
        self.register_functions(&pre.statements)?;
        for init in pre.statements.iter() {
            self.execute_statement(init)?;
        }
        while is_truthy(&self.evaluate(statement.condition)?) {
            self.execute_block(statement.body)?;
            self.execute_block(statement.post)?;
        }
        self.close_scope(statement.span)
    }
}
