use super::error::RuntimeErrorKind;
use crate::parser::statement::FunctionDefinition;
use crate::string::IdentName;
use crate::value::Word;
use std::collections::HashMap;

/// Functions visible to one environment. A callee's table points back at the
/// table that was visible at the call site, so lookups walk outwards without
/// ever copying definitions.
#[derive(Debug, Default)]
pub struct FunctionTable<'prog, 'outer> {
    local: HashMap<IdentName, &'prog FunctionDefinition>,
    parent: Option<&'outer FunctionTable<'prog, 'outer>>,
}

impl<'prog, 'outer> FunctionTable<'prog, 'outer> {
    pub fn lookup(&self, name: &str) -> Option<&'prog FunctionDefinition> {
        match self.local.get(name) {
            Some(function) => Some(*function),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }

    fn contains_local(&self, name: &str) -> bool {
        self.local.contains_key(name)
    }
}

/// Variable bindings, function table and scope frames of a single executor.
///
/// Every name introduced while a frame is innermost is recorded in that frame,
/// and closing the frame removes exactly those names.
#[derive(Debug, Default)]
pub struct Environment<'prog, 'outer> {
    variables: HashMap<IdentName, Word>,
    functions: FunctionTable<'prog, 'outer>,
    frames: Vec<Vec<IdentName>>,
}

impl<'prog, 'outer> Environment<'prog, 'outer> {
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
            functions: FunctionTable {
                local: HashMap::new(),
                parent: None,
            },
            frames: Vec::new(),
        }
    }

    /// An empty environment that can call every function in `functions`.
    pub fn with_parent(functions: &'outer FunctionTable<'prog, 'outer>) -> Self {
        Self {
            variables: HashMap::new(),
            functions: FunctionTable {
                local: HashMap::new(),
                parent: Some(functions),
            },
            frames: Vec::new(),
        }
    }

    pub fn functions(&self) -> &FunctionTable<'prog, 'outer> {
        &self.functions
    }

    /// Whether `name` is a variable or a function of this environment. Tables
    /// inherited from the call site are not consulted.
    pub fn is_declared(&self, name: &str) -> bool {
        self.variables.contains_key(name) || self.functions.contains_local(name)
    }

    /// Binds a name outside of any frame. Used for parameters, return
    /// variables and initial variables, which live as long as the environment.
    pub fn bind(&mut self, name: &IdentName, value: Word) -> Result<(), RuntimeErrorKind> {
        if self.is_declared(name) {
            return Err(RuntimeErrorKind::DuplicateDeclaration(name.clone()));
        }
        self.variables.insert(name.clone(), value);
        Ok(())
    }

    pub fn open_scope(&mut self) {
        self.frames.push(Vec::new());
        tracing::debug!(depth = self.frames.len(), "opened scope");
    }

    pub fn close_scope(&mut self) -> Result<(), RuntimeErrorKind> {
        let frame = self.frames.pop().ok_or(RuntimeErrorKind::ScopeUnderflow)?;
        for name in frame {
            let removed = usize::from(self.variables.remove(&name).is_some())
                + usize::from(self.functions.local.remove(&name).is_some());
            if removed != 1 {
                return Err(RuntimeErrorKind::ScopeIntegrity { name, removed });
            }
        }
        tracing::debug!(depth = self.frames.len(), "closed scope");
        Ok(())
    }

    pub fn declare_variable(&mut self, name: &IdentName, value: Word) -> Result<(), RuntimeErrorKind> {
        self.bind(name, value)?;
        if let Some(frame) = self.frames.last_mut() {
            frame.push(name.clone());
        }
        Ok(())
    }

    pub fn assign(&mut self, name: &IdentName, value: Word) -> Result<(), RuntimeErrorKind> {
        match self.variables.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeErrorKind::UndeclaredAssignment(name.clone())),
        }
    }

    pub fn read(&self, name: &IdentName) -> Result<Word, RuntimeErrorKind> {
        self.variables
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeErrorKind::UndefinedVariable(name.clone()))
    }

    /// Functions in an outer table may be shadowed; two definitions in this
    /// environment's own table may not.
    pub fn register_function(
        &mut self,
        function: &'prog FunctionDefinition,
    ) -> Result<(), RuntimeErrorKind> {
        let name = &function.name.name;
        if self.functions.contains_local(name) || self.variables.contains_key(name) {
            return Err(RuntimeErrorKind::DuplicateDeclaration(name.clone()));
        }
        self.functions.local.insert(name.clone(), function);
        if let Some(frame) = self.frames.last_mut() {
            frame.push(name.clone());
        }
        Ok(())
    }

    pub fn lookup_function(&self, name: &str) -> Option<&'prog FunctionDefinition> {
        self.functions.lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> IdentName {
        text.into()
    }

    #[test]
    fn close_scope_removes_exactly_its_names() {
        let mut environment = Environment::new();
        environment.open_scope();
        environment
            .declare_variable(&name("outer"), Word::from(1u64))
            .unwrap();
        environment.open_scope();
        environment
            .declare_variable(&name("inner"), Word::from(2u64))
            .unwrap();
        environment.close_scope().unwrap();

        assert!(environment.read(&name("inner")).is_err());
        assert_eq!(environment.read(&name("outer")), Ok(Word::from(1u64)));
        environment.close_scope().unwrap();
        assert!(!environment.is_declared("outer"));
    }

    #[test]
    fn missing_binding_is_an_integrity_violation() {
        let mut environment = Environment::new();
        environment.open_scope();
        environment.declare_variable(&name("x"), Word::ZERO).unwrap();
        environment.variables.remove("x");

        assert_eq!(
            environment.close_scope(),
            Err(RuntimeErrorKind::ScopeIntegrity {
                name: name("x"),
                removed: 0
            })
        );
    }

    #[test]
    fn double_binding_is_an_integrity_violation() {
        let mut environment = Environment::new();
        environment.open_scope();
        environment.declare_variable(&name("x"), Word::ZERO).unwrap();
        environment.frames[0].push(name("x"));

        assert_eq!(
            environment.close_scope(),
            Err(RuntimeErrorKind::ScopeIntegrity {
                name: name("x"),
                removed: 0
            })
        );
    }

    #[test]
    fn closing_without_frames_underflows() {
        let mut environment = Environment::new();
        assert_eq!(
            environment.close_scope(),
            Err(RuntimeErrorKind::ScopeUnderflow)
        );
    }

    #[test]
    fn bound_names_survive_scopes() {
        let mut environment = Environment::new();
        environment.bind(&name("param"), Word::from(7u64)).unwrap();
        environment.open_scope();
        environment.close_scope().unwrap();
        assert_eq!(environment.read(&name("param")), Ok(Word::from(7u64)));
    }
}
