use std::collections::HashMap;

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::ToPrimitive;
use strum_macros::Display;

/// The fixed register conventions of the generated code. Expression
/// evaluation runs through T0/T1 and the runtime stack; V0 carries
/// service results and function return values; A0 carries service
/// arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[allow(dead_code)] // Library interface
pub enum Register {
    #[strum(serialize = "$zero")]
    ZERO,
    #[strum(serialize = "$v0")]
    V0,
    #[strum(serialize = "$a0")]
    A0,
    #[strum(serialize = "$t0")]
    T0,
    #[strum(serialize = "$t1")]
    T1,
    #[strum(serialize = "$sp")]
    SP,
    #[strum(serialize = "$fp")]
    FP,
    #[strum(serialize = "$ra")]
    RA,
}

/// SPIM system service codes, requested by loading the code into V0 and
/// executing `syscall`. Booleans are read and written as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[allow(non_camel_case_types)]
#[repr(u32)]
pub enum Syscall {
    PRINT_INT = 1,
    PRINT_STRING = 4,
    READ_INT = 5,
    EXIT = 10,
}

/// MipsBuilder is a Builder utility class that assembles the two output
/// sections linearly. Backend generators use it to express the business
/// logic of generation without worrying about section bookkeeping, label
/// numbering or string-literal placement.
///
/// Labels come from one monotonic counter seeded at zero, so the emitted
/// text is byte-identical across runs over the same input. String
/// literals are interned by contents: the same literal written twice
/// shares one data-section label.
pub struct MipsBuilder {
    data_out: Vec<String>,
    text_out: Vec<String>,

    label_count: u64,
    interned_strings: HashMap<String, String>,
    string_count: u64,
}

impl MipsBuilder {
    pub fn new() -> Self {
        Self {
            data_out: vec![],
            text_out: vec![],
            label_count: 0,
            interned_strings: HashMap::new(),
            string_count: 0,
        }
    }

    /// Create label generates a new unique label to address instructions
    /// in the text section. This is useful for jump targets where the
    /// surrounding code size is not known yet.
    /// ## Typical Usage
    /// let exit = builder.create_label();   // Creates new unique label
    /// builder.emit("j", exit.clone());     // Jump to it from anywhere
    /// ... // Generate instructions
    /// builder.set_label(&exit);            // Place it
    pub fn create_label(&mut self) -> String {
        let label = format!("_L{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// Place a string literal in the data section and return its label.
    /// Repeated identical literals share one label.
    pub fn intern_string(&mut self, literal: &str) -> String {
        if let Some(label) = self.interned_strings.get(literal) {
            return label.clone();
        }

        let label = format!("_S{}", self.string_count);
        self.string_count += 1;
        self.data_out.push(format!("{}:\t.asciiz {}", label, literal));
        self.interned_strings
            .insert(String::from(literal), label.clone());
        label
    }

    /// Reserve one word in the data section under the label `_name`.
    pub fn add_global(&mut self, name: &str) {
        self.data_out.push(String::from("\t.align 2"));
        self.data_out.push(format!("_{}:\t.space 4", name));
    }

    /// Place a label at the current end of the text section.
    pub fn set_label(&mut self, label: &str) {
        self.text_out.push(format!("{}:", label));
    }

    /// Emit an assembler directive into the text section.
    pub fn directive(&mut self, directive: &str) {
        self.text_out.push(format!("\t{}", directive));
    }

    /// Comments are purely decorative and annotate the generated text.
    pub fn comment(&mut self, comment: &str) {
        self.text_out.push(format!("\t\t# {}", comment));
    }

    /// Emit one instruction with its formatted operand list.
    pub fn emit(&mut self, op: &str, operands: String) {
        self.text_out.push(format!("\t{}\t{}", op, operands));
    }

    /// Emit one instruction without operands.
    pub fn emit_op(&mut self, op: &str) {
        self.text_out.push(format!("\t{}", op));
    }

    /// Emit an indexed load or store, `op reg, offset(base)`.
    pub fn emit_indexed(&mut self, op: &str, reg: Register, offset: i32, base: Register) {
        self.emit(op, format!("{}, {}({})", reg, offset, base));
    }

    /// Push one register onto the runtime stack. The stack pointer points
    /// at the next free slot and grows downward.
    pub fn gen_push(&mut self, reg: Register) {
        self.emit_indexed("sw", reg, 0, Register::SP);
        self.emit("subu", format!("{}, {}, 4", Register::SP, Register::SP));
    }

    /// Pop the top of the runtime stack into a register.
    pub fn gen_pop(&mut self, reg: Register) {
        self.emit_indexed("lw", reg, 4, Register::SP);
        self.emit("addu", format!("{}, {}, 4", Register::SP, Register::SP));
    }

    /// Request one system service.
    pub fn gen_syscall(&mut self, service: Syscall) {
        let code = service.to_u32().unwrap_or(0);
        self.emit("li", format!("{}, {}", Register::V0, code));
        self.emit_op("syscall");
    }

    /// Resolve the builder into the final assembly text, data section
    /// first, consuming self in the process.
    pub fn finalize(self) -> String {
        let mut output = String::new();

        output.push_str("\t.data\n");
        for line in &self.data_out {
            output.push_str(line);
            output.push('\n');
        }

        output.push_str("\t.text\n");
        for line in &self.text_out {
            output.push_str(line);
            output.push('\n');
        }

        output
    }
}
