//! Yul source emission.
//!
//! Walks a [`YulProgram`] and prints a Yul object. Variable references are
//! resolved against the variables actually in scope, so any index is legal
//! in the tree. Statements that cannot be placed legally where they occur
//! (a `break` outside a loop body, a call with no function of matching
//! arity in scope) are dropped instead of printed.
//!
//! Names are minted from two counters per emission, `x_N` for variables
//! and `f_N` for functions, so no name is ever shadowed.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::config::EmitConfig;
use crate::error::{EmitError, EmitResult};
use crate::printer::Printer;

use super::ast::{
    BinaryOpKind, Block, BoundedForStmt, CallReturns, CopyKind, CreateKind, DataQuery, Expression,
    ForStmt, FunctionCall, FunctionDef, HaltKind, Literal, LogTopics, LowLevelCallKind,
    NullaryOpKind, RetRevKind, Statement, StoreKind, SwitchStmt, TerminatingStmt, TernaryOpKind,
    UnaryOpKind, VarRef, YulProgram,
};

/// Maximum number of hex digits in a literal (256 bits).
const MAX_HEX_DIGITS: usize = 64;

/// Maximum length of a string literal (32 bytes).
const MAX_STRING_LEN: usize = 32;

/// Emitted Yul object text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedYul {
    pub source: String,
}

impl EmittedYul {
    /// blake3 digest of the source text, as lowercase hex.
    pub fn fingerprint(&self) -> String {
        blake3::hash(self.source.as_bytes()).to_hex().to_string()
    }
}

/// Emits `program` with the default configuration.
pub fn emit(program: &YulProgram) -> EmitResult<EmittedYul> {
    emit_with_config(program, &EmitConfig::default())
}

/// Emits `program` as a Yul object.
///
/// Fails if a required expression or literal is unset.
pub fn emit_with_config(program: &YulProgram, config: &EmitConfig) -> EmitResult<EmittedYul> {
    let emitter = Emitter::new(config, program.data.len());
    let source = emitter.emit_program(program)?;
    debug!(target: "yulsmith::emit", bytes = source.len(), "emitted yul object");
    Ok(EmittedYul { source })
}

/// Placement rules in effect for a statement.
#[derive(Debug, Clone, Copy)]
struct Context {
    in_loop: bool,
    in_function: bool,
    allow_functions: bool,
}

impl Context {
    const TOP: Context = Context {
        in_loop: false,
        in_function: false,
        allow_functions: true,
    };

    const FUNCTION: Context = Context {
        in_loop: false,
        in_function: true,
        allow_functions: true,
    };

    /// For-loop init and post blocks.
    const LOOP_HEADER: Context = Context {
        in_loop: false,
        in_function: false,
        allow_functions: false,
    };

    fn loop_body(self) -> Context {
        Context {
            in_loop: true,
            allow_functions: true,
            ..self
        }
    }
}

/// Variables declared in one block. A barrier frame (function parameters)
/// hides every frame below it.
#[derive(Debug, Default)]
struct Frame {
    names: Vec<String>,
    barrier: bool,
}

#[derive(Debug, Clone)]
struct Signature {
    name: String,
    inputs: usize,
    outputs: usize,
}

struct Emitter<'a> {
    config: &'a EmitConfig,
    printer: Printer,
    /// The object itself followed by its data segments.
    data_names: Vec<String>,
    vars: Vec<Frame>,
    functions: Vec<Vec<Signature>>,
    next_var: u32,
    next_function: u32,
}

impl<'a> Emitter<'a> {
    fn new(config: &'a EmitConfig, data_segments: usize) -> Self {
        let mut data_names = vec![config.object_name.clone()];
        data_names.extend((0..data_segments).map(data_segment_name));
        Self {
            config,
            printer: Printer::new(config.indent_str()),
            data_names,
            vars: Vec::new(),
            functions: Vec::new(),
            next_var: 0,
            next_function: 0,
        }
    }

    fn emit_program(mut self, program: &YulProgram) -> EmitResult<String> {
        self.printer
            .open(&format!("object \"{}\"", self.config.object_name));
        self.emit_block("code", &program.code, Context::TOP)?;
        for (index, bytes) in program.data.iter().enumerate() {
            self.printer.line(&format!(
                "data \"{}\" hex\"{}\"",
                data_segment_name(index),
                to_hex(bytes)
            ));
        }
        self.printer.close();
        Ok(self.printer.finish())
    }

    fn fresh_var(&mut self) -> String {
        let name = format!("x_{}", self.next_var);
        self.next_var += 1;
        name
    }

    fn fresh_function(&mut self) -> String {
        let name = format!("f_{}", self.next_function);
        self.next_function += 1;
        name
    }

    fn declare(&mut self, name: String) {
        if let Some(frame) = self.vars.last_mut() {
            frame.names.push(name);
        }
    }

    fn visible_vars(&self) -> Vec<&str> {
        let start = self.vars.iter().rposition(|frame| frame.barrier).unwrap_or(0);
        self.vars[start..]
            .iter()
            .flat_map(|frame| frame.names.iter().map(String::as_str))
            .collect()
    }

    fn resolve(&self, var: VarRef) -> Option<String> {
        let visible = self.visible_vars();
        if visible.is_empty() {
            return None;
        }
        Some(visible[var.index as usize % visible.len()].to_string())
    }

    /// Picks the callee among visible functions accepted by `accept`.
    fn pick_function(&self, func_index: u32, accept: impl Fn(&Signature) -> bool) -> Option<Signature> {
        let candidates: Vec<&Signature> = self
            .functions
            .iter()
            .flatten()
            .filter(|sig| accept(*sig))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[func_index as usize % candidates.len()].clone())
    }

    /// Names every function defined directly in `block`, so calls may
    /// precede definitions.
    fn hoist(&mut self, block: &Block) -> Vec<Signature> {
        let mut signatures = Vec::new();
        for stmt in &block.statements {
            if let Statement::FunctionDef(def) = stmt {
                signatures.push(Signature {
                    name: self.fresh_function(),
                    inputs: (def.num_inputs % 5) as usize,
                    outputs: (def.num_outputs % 5) as usize,
                });
            }
        }
        signatures
    }

    fn emit_block(&mut self, header: &str, block: &Block, ctx: Context) -> EmitResult<()> {
        self.printer.open(header);
        self.emit_block_contents(block, ctx)?;
        self.printer.close();
        Ok(())
    }

    fn emit_block_contents(&mut self, block: &Block, ctx: Context) -> EmitResult<()> {
        self.vars.push(Frame::default());
        let signatures = if ctx.allow_functions {
            self.hoist(block)
        } else {
            Vec::new()
        };
        self.functions.push(signatures.clone());

        let mut definitions = signatures.into_iter();
        for stmt in &block.statements {
            self.emit_statement(stmt, ctx, &mut definitions)?;
        }

        self.functions.pop();
        self.vars.pop();
        Ok(())
    }

    fn emit_statement(
        &mut self,
        stmt: &Statement,
        ctx: Context,
        definitions: &mut std::vec::IntoIter<Signature>,
    ) -> EmitResult<()> {
        match stmt {
            Statement::Decl(decl) => {
                let value = self.expr(&decl.expr, "variable initializer")?;
                let name = self.fresh_var();
                self.printer.line(&format!("let {} := {}", name, value));
                self.declare(name);
            }
            Statement::MultiDecl(decl) => {
                let names: Vec<String> = (0..decl.num_vars % 3 + 2).map(|_| self.fresh_var()).collect();
                self.printer.line(&format!("let {}", names.join(", ")));
                for name in names {
                    self.declare(name);
                }
            }
            Statement::Assignment(assign) => {
                let value = self.expr(&assign.expr, "assignment value")?;
                if let Some(target) = self.resolve(assign.target) {
                    self.printer.line(&format!("{} := {}", target, value));
                }
            }
            Statement::If(stmt) => {
                let cond = self.expr(&stmt.cond, "if condition")?;
                self.emit_block(&format!("if {}", cond), &stmt.body, ctx)?;
            }
            Statement::Store(store) => {
                let loc = self.expr(&store.loc, "store location")?;
                let val = self.expr(&store.val, "store value")?;
                let name = match store.kind {
                    StoreKind::MStore => "mstore",
                    StoreKind::SStore => "sstore",
                    StoreKind::MStore8 => "mstore8",
                };
                self.printer.line(&format!("{}({}, {})", name, loc, val));
            }
            Statement::Block(block) => self.emit_block("", block, ctx)?,
            Statement::For(stmt) => self.emit_for(stmt, ctx)?,
            Statement::BoundedFor(stmt) => self.emit_bounded_for(stmt, ctx)?,
            Statement::Switch(stmt) => self.emit_switch(stmt, ctx)?,
            Statement::Break => {
                if ctx.in_loop {
                    self.printer.line("break");
                }
            }
            Statement::Continue => {
                if ctx.in_loop {
                    self.printer.line("continue");
                }
            }
            Statement::Log(log) => {
                let mut args = vec![
                    self.expr(&log.pos, "log position")?,
                    self.expr(&log.size, "log size")?,
                ];
                let topics = [&log.t1, &log.t2, &log.t3, &log.t4];
                let count = log_topic_count(log.topics);
                for topic in &topics[..count] {
                    args.push(self.expr(topic, "log topic")?);
                }
                self.printer
                    .line(&format!("log{}({})", count, args.join(", ")));
            }
            Statement::Copy(copy) => {
                let name = match copy.kind {
                    CopyKind::CallData => "calldatacopy",
                    CopyKind::Code => "codecopy",
                    CopyKind::ReturnData => "returndatacopy",
                    CopyKind::Data => "datacopy",
                };
                let target = self.expr(&copy.target, "copy target")?;
                let source = self.expr(&copy.source, "copy source")?;
                let size = self.expr(&copy.size, "copy size")?;
                self.printer
                    .line(&format!("{}({}, {}, {})", name, target, source, size));
            }
            Statement::ExtCodeCopy(copy) => {
                let addr = self.expr(&copy.addr, "extcodecopy address")?;
                let target = self.expr(&copy.target, "extcodecopy target")?;
                let source = self.expr(&copy.source, "extcodecopy source")?;
                let size = self.expr(&copy.size, "extcodecopy size")?;
                self.printer.line(&format!(
                    "extcodecopy({}, {}, {}, {})",
                    addr, target, source, size
                ));
            }
            Statement::Terminate(term) => {
                let text = match term {
                    TerminatingStmt::Halt(HaltKind::Stop) => "stop()".to_string(),
                    TerminatingStmt::Halt(HaltKind::Invalid) => "invalid()".to_string(),
                    TerminatingStmt::RetRev(stmt) => {
                        let name = match stmt.kind {
                            RetRevKind::Return => "return",
                            RetRevKind::Revert => "revert",
                        };
                        let pos = self.expr(&stmt.pos, "return position")?;
                        let size = self.expr(&stmt.size, "return size")?;
                        format!("{}({}, {})", name, pos, size)
                    }
                    TerminatingStmt::SelfDestruct(stmt) => {
                        format!("selfdestruct({})", self.expr(&stmt.addr, "selfdestruct address")?)
                    }
                };
                self.printer.line(&text);
            }
            Statement::FunctionCall(call) => self.emit_call_statement(call)?,
            Statement::FunctionDef(def) => {
                if ctx.allow_functions {
                    if let Some(signature) = definitions.next() {
                        self.emit_function(def, signature)?;
                    }
                }
            }
            Statement::Pop(pop) => {
                let value = self.expr(&pop.expr, "pop argument")?;
                self.printer.line(&format!("pop({})", value));
            }
            Statement::Leave => {
                if ctx.in_function {
                    self.printer.line("leave");
                }
            }
        }
        Ok(())
    }

    fn emit_function(&mut self, def: &FunctionDef, signature: Signature) -> EmitResult<()> {
        let inputs: Vec<String> = (0..signature.inputs).map(|_| self.fresh_var()).collect();
        let outputs: Vec<String> = (0..signature.outputs).map(|_| self.fresh_var()).collect();

        let mut header = format!("function {}({})", signature.name, inputs.join(", "));
        if !outputs.is_empty() {
            header.push_str(" -> ");
            header.push_str(&outputs.join(", "));
        }

        let mut names = inputs;
        names.extend(outputs);
        self.vars.push(Frame {
            names,
            barrier: true,
        });
        self.emit_block(&header, &def.body, Context::FUNCTION)?;
        self.vars.pop();
        Ok(())
    }

    fn emit_for(&mut self, stmt: &ForStmt, ctx: Context) -> EmitResult<()> {
        let header_ctx = Context::LOOP_HEADER;
        let mut no_definitions = Vec::new().into_iter();

        // Variables declared in init stay visible in cond, post and body.
        self.vars.push(Frame::default());
        self.functions.push(Vec::new());

        self.printer.open("for");
        for init in &stmt.init.statements {
            self.emit_statement(init, header_ctx, &mut no_definitions)?;
        }
        let cond = self.expr(&stmt.cond, "for condition")?;
        self.printer.reopen(&cond);

        self.vars.push(Frame::default());
        for post in &stmt.post.statements {
            self.emit_statement(post, header_ctx, &mut no_definitions)?;
        }
        self.vars.pop();
        self.printer.reopen("");

        self.emit_block_contents(&stmt.body, ctx.loop_body())?;
        self.printer.close();

        self.functions.pop();
        self.vars.pop();
        Ok(())
    }

    /// `for { let i := 0 } lt(i, N) { i := add(i, 1) } { ... }`; the
    /// counter is kept out of scope so the body cannot reassign it.
    fn emit_bounded_for(&mut self, stmt: &BoundedForStmt, ctx: Context) -> EmitResult<()> {
        let counter = self.fresh_var();
        let bound = self.config.max_bounded_iterations;
        self.printer.open(&format!(
            "for {{ let {c} := 0 }} lt({c}, {bound}) {{ {c} := add({c}, 1) }}",
            c = counter,
            bound = bound
        ));
        self.emit_block_contents(&stmt.body, ctx.loop_body())?;
        self.printer.close();
        Ok(())
    }

    fn emit_switch(&mut self, stmt: &SwitchStmt, ctx: Context) -> EmitResult<()> {
        let scrutinee = self.expr(&stmt.scrutinee, "switch expression")?;
        self.printer.line(&format!("switch {}", scrutinee));

        let mut seen = FxHashSet::default();
        for case in &stmt.cases {
            let (text, value) = literal(&case.literal, "switch case")?;
            if !seen.insert(value) {
                continue;
            }
            self.emit_block(&format!("case {}", text), &case.body, ctx)?;
        }

        match &stmt.default {
            Some(default) => self.emit_block("default", default, ctx)?,
            None if seen.is_empty() => self.emit_block("default", &Block::default(), ctx)?,
            None => {}
        }
        Ok(())
    }

    fn emit_call_statement(&mut self, call: &FunctionCall) -> EmitResult<()> {
        match call.ret {
            CallReturns::Zero => {
                if let Some(signature) = self.pick_function(call.func_index, |s| s.outputs == 0) {
                    let args = self.call_args(call, signature.inputs)?;
                    self.printer.line(&format!("{}({})", signature.name, args));
                }
            }
            CallReturns::Single => {
                if let Some(signature) = self.pick_function(call.func_index, |s| s.outputs == 1) {
                    let args = self.call_args(call, signature.inputs)?;
                    self.printer
                        .line(&format!("pop({}({}))", signature.name, args));
                }
            }
            CallReturns::MultiDecl => {
                if let Some(signature) = self.pick_function(call.func_index, |s| s.outputs >= 2) {
                    let args = self.call_args(call, signature.inputs)?;
                    let names: Vec<String> =
                        (0..signature.outputs).map(|_| self.fresh_var()).collect();
                    self.printer.line(&format!(
                        "let {} := {}({})",
                        names.join(", "),
                        signature.name,
                        args
                    ));
                    for name in names {
                        self.declare(name);
                    }
                }
            }
            CallReturns::MultiAssign => {
                if let Some(signature) = self.pick_function(call.func_index, |s| s.outputs >= 2) {
                    let args = self.call_args(call, signature.inputs)?;
                    let targets: Vec<String> = call.outs[..signature.outputs]
                        .iter()
                        .filter_map(|out| self.resolve(*out))
                        .collect();
                    let distinct: FxHashSet<&str> = targets.iter().map(String::as_str).collect();
                    if targets.len() == signature.outputs && distinct.len() == targets.len() {
                        self.printer.line(&format!(
                            "{} := {}({})",
                            targets.join(", "),
                            signature.name,
                            args
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn call_args(&self, call: &FunctionCall, count: usize) -> EmitResult<String> {
        let args = call.args[..count]
            .iter()
            .map(|arg| self.expr(arg, "call argument"))
            .collect::<EmitResult<Vec<_>>>()?;
        Ok(args.join(", "))
    }

    fn expr(&self, expr: &Expression, context: &'static str) -> EmitResult<String> {
        let text = match expr {
            Expression::Unset => return Err(EmitError::UnsetExpression { context }),
            Expression::VarRef(var) => self.resolve(*var).unwrap_or_else(|| "0".to_string()),
            Expression::Literal(lit) => literal(lit, context)?.0,
            Expression::Binary(op) => format!(
                "{}({}, {})",
                binary_name(op.op),
                self.expr(&op.left, context)?,
                self.expr(&op.right, context)?
            ),
            Expression::Unary(op) => {
                format!("{}({})", unary_name(op.op), self.expr(&op.operand, context)?)
            }
            Expression::Ternary(op) => format!(
                "{}({}, {}, {})",
                match op.op {
                    TernaryOpKind::AddMod => "addmod",
                    TernaryOpKind::MulMod => "mulmod",
                },
                self.expr(&op.arg1, context)?,
                self.expr(&op.arg2, context)?,
                self.expr(&op.arg3, context)?
            ),
            Expression::Nullary(op) => format!("{}()", nullary_name(op.op)),
            Expression::Call(call) => {
                let signature = match call.ret {
                    CallReturns::Single => {
                        self.pick_function(call.func_index, |s| s.outputs == 1)
                    }
                    _ => None,
                };
                match signature {
                    Some(signature) => format!(
                        "{}({})",
                        signature.name,
                        self.call_args(call, signature.inputs)?
                    ),
                    None => "0".to_string(),
                }
            }
            Expression::LowLevelCall(call) => {
                let gas = self.expr(&call.gas, context)?;
                let addr = self.expr(&call.addr, context)?;
                let input = self.expr(&call.input, context)?;
                let input_size = self.expr(&call.input_size, context)?;
                let output = self.expr(&call.output, context)?;
                let output_size = self.expr(&call.output_size, context)?;
                match call.kind {
                    LowLevelCallKind::Call | LowLevelCallKind::CallCode => {
                        let name = if call.kind == LowLevelCallKind::Call {
                            "call"
                        } else {
                            "callcode"
                        };
                        format!(
                            "{}({}, {}, {}, {}, {}, {}, {})",
                            name,
                            gas,
                            addr,
                            self.expr(&call.wei, context)?,
                            input,
                            input_size,
                            output,
                            output_size
                        )
                    }
                    LowLevelCallKind::DelegateCall | LowLevelCallKind::StaticCall => {
                        let name = if call.kind == LowLevelCallKind::DelegateCall {
                            "delegatecall"
                        } else {
                            "staticcall"
                        };
                        format!(
                            "{}({}, {}, {}, {}, {}, {})",
                            name, gas, addr, input, input_size, output, output_size
                        )
                    }
                }
            }
            Expression::Create(create) => {
                let wei = self.expr(&create.wei, context)?;
                let position = self.expr(&create.position, context)?;
                let size = self.expr(&create.size, context)?;
                match create.kind {
                    CreateKind::Create => format!("create({}, {}, {})", wei, position, size),
                    CreateKind::Create2 => format!(
                        "create2({}, {}, {}, {})",
                        wei,
                        position,
                        size,
                        self.expr(&create.salt, context)?
                    ),
                }
            }
            Expression::Data(data) => {
                let name = &self.data_names[data.identifier as usize % self.data_names.len()];
                let op = match data.op {
                    DataQuery::Size => "datasize",
                    DataQuery::Offset => "dataoffset",
                };
                format!("{}(\"{}\")", op, name)
            }
        };
        Ok(text)
    }
}

fn data_segment_name(index: usize) -> String {
    format!("data{}", index)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}

fn log_topic_count(topics: LogTopics) -> usize {
    match topics {
        LogTopics::Zero => 0,
        LogTopics::One => 1,
        LogTopics::Two => 2,
        LogTopics::Three => 3,
        LogTopics::Four => 4,
    }
}

/// Hex digits of `raw`, lowercased and capped at 256 bits.
fn sanitize_hex(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_hexdigit)
        .take(MAX_HEX_DIGITS)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if digits.is_empty() {
        "0".to_string()
    } else {
        digits
    }
}

/// Alphanumeric characters of `raw`, capped at 32 bytes.
fn sanitize_str(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_STRING_LEN)
        .collect()
}

/// Returns the literal's source text and its value as 64 hex digits.
///
/// Strings are left-aligned in the 32-byte word, numbers right-aligned.
fn literal(lit: &Literal, context: &'static str) -> EmitResult<(String, String)> {
    match lit {
        Literal::Unset => Err(EmitError::UnsetLiteral { context }),
        Literal::Int(value) => Ok((value.to_string(), format!("{:064x}", value))),
        Literal::Hex(raw) => {
            let digits = sanitize_hex(raw);
            let significant = digits.trim_start_matches('0');
            let value = format!("{:0>64}", significant);
            Ok((format!("0x{}", digits), value))
        }
        Literal::Str(raw) => {
            let text = sanitize_str(raw);
            let value = format!("{:0<64}", to_hex(text.as_bytes()));
            Ok((format!("\"{}\"", text), value))
        }
    }
}

fn binary_name(op: BinaryOpKind) -> &'static str {
    match op {
        BinaryOpKind::Add => "add",
        BinaryOpKind::Sub => "sub",
        BinaryOpKind::Mul => "mul",
        BinaryOpKind::Div => "div",
        BinaryOpKind::Mod => "mod",
        BinaryOpKind::Xor => "xor",
        BinaryOpKind::And => "and",
        BinaryOpKind::Or => "or",
        BinaryOpKind::Eq => "eq",
        BinaryOpKind::Lt => "lt",
        BinaryOpKind::Gt => "gt",
        BinaryOpKind::Shr => "shr",
        BinaryOpKind::Shl => "shl",
        BinaryOpKind::Sar => "sar",
        BinaryOpKind::SDiv => "sdiv",
        BinaryOpKind::SMod => "smod",
        BinaryOpKind::Exp => "exp",
        BinaryOpKind::SLt => "slt",
        BinaryOpKind::SGt => "sgt",
        BinaryOpKind::Byte => "byte",
        BinaryOpKind::SignExtend => "signextend",
        BinaryOpKind::Keccak256 => "keccak256",
    }
}

fn unary_name(op: UnaryOpKind) -> &'static str {
    match op {
        UnaryOpKind::Not => "not",
        UnaryOpKind::MLoad => "mload",
        UnaryOpKind::SLoad => "sload",
        UnaryOpKind::IsZero => "iszero",
        UnaryOpKind::CallDataLoad => "calldataload",
        UnaryOpKind::ExtCodeSize => "extcodesize",
        UnaryOpKind::ExtCodeHash => "extcodehash",
        UnaryOpKind::Balance => "balance",
        UnaryOpKind::BlockHash => "blockhash",
    }
}

fn nullary_name(op: NullaryOpKind) -> &'static str {
    match op {
        NullaryOpKind::Msize => "msize",
        NullaryOpKind::Gas => "gas",
        NullaryOpKind::CallDataSize => "calldatasize",
        NullaryOpKind::CodeSize => "codesize",
        NullaryOpKind::ReturnDataSize => "returndatasize",
        NullaryOpKind::Address => "address",
        NullaryOpKind::Origin => "origin",
        NullaryOpKind::Caller => "caller",
        NullaryOpKind::CallValue => "callvalue",
        NullaryOpKind::GasPrice => "gasprice",
        NullaryOpKind::Coinbase => "coinbase",
        NullaryOpKind::Timestamp => "timestamp",
        NullaryOpKind::Number => "number",
        NullaryOpKind::GasLimit => "gaslimit",
        NullaryOpKind::SelfBalance => "selfbalance",
        NullaryOpKind::ChainId => "chainid",
    }
}
