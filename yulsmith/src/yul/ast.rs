//! Yul grammar tree.
//!
//! Every grammar one-of is a closed enum, so adding a node kind forces each
//! dispatch site (filler, emitter, traversal) to be revisited. Children are
//! owned values; operators detach with `std::mem::take` and reattach by
//! assignment.
//!
//! `Expression::Unset` and `Literal::Unset` are transient construction
//! states. Operators and factories never return with one in a required
//! position.

use serde::{Deserialize, Serialize};

crate::seed_enum! {
    /// Return arity of a user function call.
    #[derive(Default)]
    pub enum CallReturns {
        Zero = 1,
        #[default]
        Single = 2,
        MultiDecl = 3,
        MultiAssign = 4,
    }
}

crate::seed_enum! {
    #[derive(Default)]
    pub enum StoreKind {
        #[default]
        MStore = 0,
        SStore = 1,
        MStore8 = 2,
    }
}

crate::seed_enum! {
    #[derive(Default)]
    pub enum NullaryOpKind {
        #[default]
        Msize = 1,
        Gas = 2,
        CallDataSize = 3,
        CodeSize = 4,
        ReturnDataSize = 5,
        Address = 6,
        Origin = 7,
        Caller = 8,
        CallValue = 9,
        GasPrice = 10,
        Coinbase = 11,
        Timestamp = 12,
        Number = 13,
        GasLimit = 14,
        SelfBalance = 15,
        ChainId = 16,
    }
}

crate::seed_enum! {
    pub enum UnaryOpKind {
        Not = 0,
        MLoad = 1,
        SLoad = 2,
        IsZero = 3,
        CallDataLoad = 4,
        ExtCodeSize = 5,
        ExtCodeHash = 6,
        Balance = 7,
        BlockHash = 8,
    }
}

crate::seed_enum! {
    pub enum BinaryOpKind {
        Add = 0,
        Sub = 1,
        Mul = 2,
        Div = 3,
        Mod = 4,
        Xor = 5,
        And = 6,
        Or = 7,
        Eq = 8,
        Lt = 9,
        Gt = 10,
        Shr = 11,
        Shl = 12,
        Sar = 13,
        SDiv = 14,
        SMod = 15,
        Exp = 16,
        SLt = 17,
        SGt = 18,
        Byte = 19,
        SignExtend = 20,
        Keccak256 = 21,
    }
}

crate::seed_enum! {
    pub enum TernaryOpKind {
        AddMod = 0,
        MulMod = 1,
    }
}

crate::seed_enum! {
    pub enum LowLevelCallKind {
        Call = 0,
        CallCode = 1,
        DelegateCall = 2,
        StaticCall = 3,
    }
}

crate::seed_enum! {
    pub enum CreateKind {
        Create = 0,
        Create2 = 1,
    }
}

crate::seed_enum! {
    /// `datasize` or `dataoffset`.
    pub enum DataQuery {
        Size = 1,
        Offset = 2,
    }
}

crate::seed_enum! {
    #[derive(Default)]
    pub enum CopyKind {
        #[default]
        CallData = 0,
        Code = 1,
        ReturnData = 2,
        Data = 3,
    }
}

crate::seed_enum! {
    /// Number of topics of a `logN` call.
    #[derive(Default)]
    pub enum LogTopics {
        #[default]
        Zero = 0,
        One = 1,
        Two = 2,
        Three = 3,
        Four = 4,
    }
}

crate::seed_enum! {
    #[derive(Default)]
    pub enum HaltKind {
        #[default]
        Stop = 0,
        Invalid = 1,
    }
}

crate::seed_enum! {
    pub enum RetRevKind {
        Return = 0,
        Revert = 1,
    }
}

/// A whole Yul object: one code block plus raw data segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YulProgram {
    pub code: Block,
    #[serde(default)]
    pub data: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn push(&mut self, stmt: Statement) {
        self.statements.push(stmt);
    }

    /// Removes the first statement matching `pred`. Returns whether one was
    /// found.
    pub fn remove_first(&mut self, pred: impl Fn(&Statement) -> bool) -> bool {
        match self.statements.iter().position(pred) {
            Some(index) => {
                self.statements.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Index into the variables visible at the reference site. Resolution is the
/// emitter's job; any value is a legal reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarRef {
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Decl(VarDecl),
    MultiDecl(MultiVarDecl),
    Assignment(Assignment),
    If(IfStmt),
    Store(StoreStmt),
    Block(Block),
    For(ForStmt),
    BoundedFor(BoundedForStmt),
    Switch(SwitchStmt),
    Break,
    Continue,
    Log(LogStmt),
    Copy(CopyStmt),
    ExtCodeCopy(ExtCodeCopyStmt),
    Terminate(TerminatingStmt),
    FunctionCall(FunctionCall),
    FunctionDef(FunctionDef),
    Pop(PopStmt),
    Leave,
}

impl Statement {
    /// Number of statement kinds.
    pub const KIND_COUNT: u32 = 19;

    /// Returns a default-constructed statement of the given kind.
    ///
    /// Kinds are numbered in declaration order; `kind` is taken modulo
    /// [`Statement::KIND_COUNT`].
    pub fn of_kind(kind: u32) -> Statement {
        match kind % Self::KIND_COUNT {
            0 => Statement::Decl(VarDecl::default()),
            1 => Statement::Assignment(Assignment::default()),
            2 => Statement::If(IfStmt::default()),
            3 => Statement::Store(StoreStmt::default()),
            4 => Statement::Block(Block::default()),
            5 => Statement::For(ForStmt::default()),
            6 => Statement::Switch(SwitchStmt::default()),
            7 => Statement::Break,
            8 => Statement::Continue,
            9 => Statement::Log(LogStmt::default()),
            10 => Statement::Copy(CopyStmt::default()),
            11 => Statement::ExtCodeCopy(ExtCodeCopyStmt::default()),
            12 => Statement::Terminate(TerminatingStmt::default()),
            13 => Statement::FunctionCall(FunctionCall::default()),
            14 => Statement::BoundedFor(BoundedForStmt::default()),
            15 => Statement::FunctionDef(FunctionDef::default()),
            16 => Statement::Pop(PopStmt::default()),
            17 => Statement::Leave,
            _ => Statement::MultiDecl(MultiVarDecl::default()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarDecl {
    pub expr: Expression,
}

/// `let a, b, ...` without an initializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiVarDecl {
    pub num_vars: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub target: VarRef,
    pub expr: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfStmt {
    pub cond: Expression,
    pub body: Block,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStmt {
    pub kind: StoreKind,
    pub loc: Expression,
    pub val: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForStmt {
    pub init: Block,
    pub cond: Expression,
    pub post: Block,
    pub body: Block,
}

/// A loop with a fixed iteration count chosen by the emitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedForStmt {
    pub body: Block,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchStmt {
    pub scrutinee: Expression,
    pub cases: Vec<CaseStmt>,
    pub default: Option<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStmt {
    pub literal: Literal,
    pub body: Block,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStmt {
    pub topics: LogTopics,
    pub pos: Expression,
    pub size: Expression,
    pub t1: Expression,
    pub t2: Expression,
    pub t3: Expression,
    pub t4: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyStmt {
    pub kind: CopyKind,
    pub target: Expression,
    pub source: Expression,
    pub size: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtCodeCopyStmt {
    pub addr: Expression,
    pub target: Expression,
    pub source: Expression,
    pub size: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminatingStmt {
    Halt(HaltKind),
    RetRev(RetRevStmt),
    SelfDestruct(SelfDestructStmt),
}

impl Default for TerminatingStmt {
    fn default() -> Self {
        TerminatingStmt::Halt(HaltKind::Stop)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetRevStmt {
    pub kind: RetRevKind,
    pub pos: Expression,
    pub size: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfDestructStmt {
    pub addr: Expression,
}

/// Call of a user-defined function, matched by the emitter to a visible
/// definition of the right return arity.
///
/// Four argument slots are always reserved; the emitter passes as many as
/// the chosen function takes. `outs` is only read for multi-assign calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub ret: CallReturns,
    pub func_index: u32,
    pub args: [Expression; 4],
    pub outs: [VarRef; 4],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub num_inputs: u32,
    pub num_outputs: u32,
    pub body: Block,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopStmt {
    pub expr: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    #[default]
    Unset,
    VarRef(VarRef),
    Literal(Literal),
    Binary(Box<BinaryOp>),
    Unary(Box<UnaryOp>),
    Ternary(Box<TernaryOp>),
    Nullary(NullaryOp),
    Call(Box<FunctionCall>),
    LowLevelCall(Box<LowLevelCall>),
    Create(Box<Create>),
    Data(DataOp),
}

impl Expression {
    pub fn is_set(&self) -> bool {
        !matches!(self, Expression::Unset)
    }

    /// Returns the subexpressions the target grammar requires for this
    /// variant, in emission order.
    ///
    /// `wei` of a low-level call is only required for `call` and
    /// `callcode`; `salt` of a create only for `create2`.
    pub fn required_children_mut(&mut self) -> Vec<&mut Expression> {
        match self {
            Expression::Unset
            | Expression::VarRef(_)
            | Expression::Literal(_)
            | Expression::Nullary(_)
            | Expression::Data(_) => Vec::new(),
            Expression::Binary(op) => vec![&mut op.left, &mut op.right],
            Expression::Unary(op) => vec![&mut op.operand],
            Expression::Ternary(op) => vec![&mut op.arg1, &mut op.arg2, &mut op.arg3],
            Expression::Call(call) => call.args.iter_mut().collect(),
            Expression::LowLevelCall(call) => {
                let LowLevelCall {
                    kind,
                    gas,
                    addr,
                    wei,
                    input,
                    input_size,
                    output,
                    output_size,
                } = call.as_mut();
                let mut children = Vec::with_capacity(7);
                if matches!(kind, LowLevelCallKind::Call | LowLevelCallKind::CallCode) {
                    children.push(wei);
                }
                children.extend([gas, addr, input, input_size, output, output_size]);
                children
            }
            Expression::Create(create) => {
                let Create {
                    kind,
                    wei,
                    position,
                    size,
                    salt,
                } = create.as_mut();
                let mut children = Vec::with_capacity(4);
                if *kind == CreateKind::Create2 {
                    children.push(salt);
                }
                children.extend([wei, position, size]);
                children
            }
        }
    }

    /// Returns `not(operand)`'s operand if this is a logical-not.
    pub fn as_not_operand(&self) -> Option<&Expression> {
        match self {
            Expression::Unary(op) if op.op == UnaryOpKind::Not => Some(&op.operand),
            _ => None,
        }
    }

    /// Returns true for `mload`, `sload` and `calldataload`.
    pub fn is_load(&self) -> bool {
        matches!(
            self,
            Expression::Unary(op) if matches!(
                op.op,
                UnaryOpKind::MLoad | UnaryOpKind::SLoad | UnaryOpKind::CallDataLoad
            )
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    #[default]
    Unset,
    Int(u64),
    /// Hex digits without the `0x` prefix.
    Hex(String),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryOp {
    pub op: BinaryOpKind,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnaryOp {
    pub op: UnaryOpKind,
    pub operand: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TernaryOp {
    pub op: TernaryOpKind,
    pub arg1: Expression,
    pub arg2: Expression,
    pub arg3: Expression,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullaryOp {
    pub op: NullaryOpKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowLevelCall {
    pub kind: LowLevelCallKind,
    pub gas: Expression,
    pub addr: Expression,
    pub wei: Expression,
    pub input: Expression,
    pub input_size: Expression,
    pub output: Expression,
    pub output_size: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Create {
    pub kind: CreateKind,
    pub wei: Expression,
    pub position: Expression,
    pub size: Expression,
    pub salt: Expression,
}

/// `datasize(name)` or `dataoffset(name)`; `identifier` selects the object
/// or one of its data segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataOp {
    pub op: DataQuery,
    pub identifier: u32,
}
