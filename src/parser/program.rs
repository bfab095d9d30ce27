use super::{
    expression::{Expression, ExpressionRef},
    statement::{Block, FunctionDefinition},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef(u32);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionRef(u32);

/// Arena storage for every node of a program under construction. Nodes refer
/// to each other through the typed handles handed out by the `push_*` methods.
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    expressions: Vec<Expression>,
    blocks: Vec<Block>,
    functions: Vec<FunctionDefinition>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self, root: BlockRef) -> Program {
        Program { inner: self, root }
    }

    pub fn push_expression(&mut self, expr: Expression) -> ExpressionRef {
        self.expressions.push(expr);
        ExpressionRef((self.expressions.len() - 1) as u32)
    }

    pub fn push_block(&mut self, block: Block) -> BlockRef {
        self.blocks.push(block);
        BlockRef((self.blocks.len() - 1) as u32)
    }

    pub fn push_function(&mut self, function: FunctionDefinition) -> FunctionRef {
        self.functions.push(function);
        FunctionRef((self.functions.len() - 1) as u32)
    }

    pub fn get_expression(&self, handle: ExpressionRef) -> Option<&Expression> {
        self.expressions.get(handle.0 as usize)
    }

    pub fn get_block(&self, handle: BlockRef) -> Option<&Block> {
        self.blocks.get(handle.0 as usize)
    }

    pub fn get_function(&self, handle: FunctionRef) -> Option<&FunctionDefinition> {
        self.functions.get(handle.0 as usize)
    }
}

/// A complete program: the node arenas plus the root block. The program
/// outlives every interpreter that runs it, so interpreters borrow nodes from
/// it rather than copying them.
#[derive(Debug, Clone)]
pub struct Program {
    inner: ProgramBuilder,
    root: BlockRef,
}

impl Program {
    pub fn root(&self) -> BlockRef {
        self.root
    }

    pub fn get_expression(&self, handle: ExpressionRef) -> Option<&Expression> {
        self.inner.get_expression(handle)
    }

    pub fn get_block(&self, handle: BlockRef) -> Option<&Block> {
        self.inner.get_block(handle)
    }

    pub fn get_function(&self, handle: FunctionRef) -> Option<&FunctionDefinition> {
        self.inner.get_function(handle)
    }
}

impl std::ops::Index<ExpressionRef> for Program {
    type Output = Expression;

    fn index(&self, handle: ExpressionRef) -> &Self::Output {
        &self.inner.expressions[handle.0 as usize]
    }
}

impl std::ops::Index<BlockRef> for Program {
    type Output = Block;

    fn index(&self, handle: BlockRef) -> &Self::Output {
        &self.inner.blocks[handle.0 as usize]
    }
}

impl std::ops::Index<FunctionRef> for Program {
    type Output = FunctionDefinition;

    fn index(&self, handle: FunctionRef) -> &Self::Output {
        &self.inner.functions[handle.0 as usize]
    }
}
