use super::{
    environment::Environment,
    error::{RuntimeError, RuntimeErrorKind},
    tree::StatementExecutor,
};
use crate::{
    machine::InstructionEvaluator,
    parser::{
        expression::{Expression, ExpressionRef, FunctionCall, InstructionCall, Literal, LiteralKind},
        Program,
    },
    value::{decode_bool, decode_number, decode_string, Word},
};

/// Computes the values of expressions. Reads the environment but never writes
/// to it; function calls run in an environment of their own.
pub struct ExpressionEvaluator<'prog, 'env, 'm, M: InstructionEvaluator + ?Sized> {
    program: &'prog Program,
    environment: &'env Environment<'prog, 'env>,
    machine: &'m mut M,
}

impl<'prog, 'env, 'm, M> ExpressionEvaluator<'prog, 'env, 'm, M>
where
    M: InstructionEvaluator + ?Sized,
{
    pub fn new(
        program: &'prog Program,
        environment: &'env Environment<'prog, 'env>,
        machine: &'m mut M,
    ) -> Self {
        Self {
            program,
            environment,
            machine,
        }
    }

    /// Evaluates an expression that must produce exactly one value.
    pub fn evaluate(&mut self, expr: ExpressionRef) -> Result<Word, RuntimeError> {
        let values = self.evaluate_multi(expr)?;
        match values.as_slice() {
            [value] => Ok(*value),
            _ => Err(RuntimeError::new(
                RuntimeErrorKind::ArityMismatch {
                    expected: 1,
                    actual: values.len(),
                },
                self.program[expr].span(),
            )),
        }
    }

    pub fn evaluate_multi(&mut self, expr: ExpressionRef) -> Result<Vec<Word>, RuntimeError> {
        let program = self.program;
        match &program[expr] {
            Expression::Literal(literal) => Ok(vec![self.evaluate_literal(literal)?]),
            Expression::Identifier(ident) => {
                let value = self
                    .environment
                    .read(&ident.name)
                    .map_err(|kind| RuntimeError::new(kind, ident.span))?;
                Ok(vec![value])
            }
            Expression::Instruction(call) => Ok(vec![self.evaluate_instruction(call)?]),
            Expression::FunctionCall(call) => self.evaluate_function_call(call),
        }
    }

    fn evaluate_literal(&self, literal: &Literal) -> Result<Word, RuntimeError> {
        let decoded = match literal.kind {
            LiteralKind::Boolean => decode_bool(&literal.text()),
            LiteralKind::Number => decode_number(&literal.text()),
            LiteralKind::String => decode_string(&literal.value),
        };
        decoded.map_err(|error| RuntimeError::new(error, literal.span))
    }

    /// Arguments are evaluated right to left, so the side effects of later
    /// arguments happen first, but the values come back in written order.
    fn evaluate_arguments(&mut self, arguments: &[ExpressionRef]) -> Result<Vec<Word>, RuntimeError> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments.iter().rev() {
            values.push(self.evaluate(*argument)?);
        }
        values.reverse();
        Ok(values)
    }

    fn evaluate_instruction(&mut self, call: &InstructionCall) -> Result<Word, RuntimeError> {
        let arguments = self.evaluate_arguments(&call.arguments)?;
        self.machine
            .evaluate(&call.instruction.name, &arguments)
            .map_err(|error| RuntimeError::new(error, call.span))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %call.function))]
    fn evaluate_function_call(&mut self, call: &FunctionCall) -> Result<Vec<Word>, RuntimeError> {
        let function = self.environment.lookup_function(&call.function.name).ok_or_else(|| {
            RuntimeError::new(
                RuntimeErrorKind::UndefinedFunction(call.function.name.clone()),
                call.function.span,
            )
        })?;

        let arguments = self.evaluate_arguments(&call.arguments)?;
        if arguments.len() != function.parameters.len() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::ArgumentCount {
                    function: call.function.name.clone(),
                    expected: function.parameters.len(),
                    actual: arguments.len(),
                },
                call.span,
            ));
        }

        tracing::debug!(?arguments, "calling function");
        let mut environment = Environment::with_parent(self.environment.functions());
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            environment
                .bind(&parameter.name, argument)
                .map_err(|kind| RuntimeError::new(kind, parameter.span))?;
        }
        for variable in function.returns.iter() {
            environment
                .bind(&variable.name, Word::ZERO)
                .map_err(|kind| RuntimeError::new(kind, variable.span))?;
        }

        let mut executor = StatementExecutor::new(self.program, environment, &mut *self.machine);
        executor.execute_block(function.body)?;

        let environment = executor.into_environment();
        function
            .returns
            .iter()
            .map(|variable| {
                environment
                    .read(&variable.name)
                    .map_err(|kind| RuntimeError::new(kind, variable.span))
            })
            .collect()
    }
}
