//! Decoded method bodies as far as the reorder pass needs them.
//!
//! Opcode decoding belongs to the instruction-stream collaborator. What is kept here is the
//! decoded result: every instruction with its operand, plus the exception clauses and the local
//! variable signature reference. Operands that name a metadata row are
//! [`Operand::Token`] and are rewritten in place by the index remapper; all other operand kinds
//! are carried through untouched.
//!
//! # References
//! - ECMA-335 6th Edition, Partition II, Section 25.4 - Method Header Format
//! - ECMA-335 6th Edition, Partition III - CIL Instruction Set

use crate::metadata::{
    method::ExceptionHandler,
    tables::{TableId, TableIndex},
};

/// Immediate operand value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Immediate {
    /// Signed 8-bit value
    Int8(i8),
    /// Unsigned 8-bit value
    UInt8(u8),
    /// Signed 16-bit value
    Int16(i16),
    /// Unsigned 16-bit value
    UInt16(u16),
    /// Signed 32-bit value
    Int32(i32),
    /// Unsigned 32-bit value
    UInt32(u32),
    /// Signed 64-bit value
    Int64(i64),
    /// Unsigned 64-bit value
    UInt64(u64),
    /// 32-bit floating point value
    Float32(f32),
    /// 64-bit floating point value
    Float64(f64),
}

/// Operand of a decoded instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand
    None,
    /// Numeric immediate
    Immediate(Immediate),
    /// Absolute branch target offset
    Target(u32),
    /// Jump table of a `switch`
    Switch(Vec<u32>),
    /// Local variable slot
    Local(u16),
    /// Argument slot
    Argument(u16),
    /// `ldstr` operand: offset into the user string heap, not a table row
    UserString(u32),
    /// A metadata table reference (`call`, `ldtoken`, `newobj`, `calli`, ...)
    Token(TableIndex),
}

impl Operand {
    /// Tables a token operand may name.
    pub const TOKEN_TABLES: &'static [TableId] = &[
        TableId::TypeDef,
        TableId::TypeRef,
        TableId::TypeSpec,
        TableId::Field,
        TableId::MethodDef,
        TableId::MemberRef,
        TableId::MethodSpec,
        TableId::StandAloneSig,
    ];

    /// The table reference carried by this operand, if any.
    #[must_use]
    pub fn token(&self) -> Option<TableIndex> {
        match self {
            Operand::Token(index) => Some(*index),
            _ => None,
        }
    }
}

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Offset of the instruction from the start of the code
    pub offset: u32,
    /// Opcode; two-byte opcodes keep the `0xFE` prefix in the high byte
    pub opcode: u16,
    /// Mnemonic, for diagnostics
    pub mnemonic: &'static str,
    /// The operand
    pub operand: Operand,
}

impl Instruction {
    /// Creates a new instruction.
    #[must_use]
    pub fn new(offset: u32, opcode: u16, mnemonic: &'static str, operand: Operand) -> Self {
        Instruction {
            offset,
            opcode,
            mnemonic,
            operand,
        }
    }
}

/// Describes one method that has been compiled to CIL bytecode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodBody {
    /// Maximum number of items on the operand stack
    pub max_stack: u16,
    /// Flag, indicating to call default constructor on all local variables
    pub init_locals: bool,
    /// `StandAloneSig` row describing the local variables, if the method has any
    pub local_var_sig: Option<TableIndex>,
    /// The decoded instruction stream
    pub instructions: Vec<Instruction>,
    /// A list of exception handlers this method has
    pub exception_handlers: Vec<ExceptionHandler>,
}

impl MethodBody {
    /// Iterates over all table references used as instruction operands.
    pub fn operand_tokens(&self) -> impl Iterator<Item = TableIndex> + '_ {
        self.instructions
            .iter()
            .filter_map(|instruction| instruction.operand.token())
    }
}
