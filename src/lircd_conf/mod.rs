//! Parse lircd.conf files, as used by lircd to describe infrared remotes

use bitflags::bitflags;
use log::warn;
use std::collections::BTreeMap;

mod builder;
mod cursor;
mod directory;
mod parse;

pub use builder::{GenerateOptions, RemoteSetBuilder, TomlSummary};
pub use directory::{accept_file, merge, read_config, Rename};
pub use parse::{parse, parse_number, parse_reader};

/// The code of a single button: either a list of protocol values which must be encoded
/// using the remote's parameters, or a raw list of pulse and space durations.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Code {
    Cooked(Vec<u64>),
    Raw { durations: Vec<u32>, toggle: u32 },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Command {
    pub name: String,
    pub code: Code,
}

impl Command {
    pub fn is_raw(&self) -> bool {
        matches!(self.code, Code::Raw { .. })
    }
}

/// A single `begin remote` .. `end remote` block.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Remote {
    pub name: String,
    pub driver: Option<String>,
    /// Flags in declaration order, as written in the file
    pub flags: Vec<String>,
    /// Numeric parameters, keyed by lower case name
    pub unary: BTreeMap<String, u64>,
    pub binary: BTreeMap<String, (u64, u64)>,
    pub commands: Vec<Command>,
    /// Where this remote was read from
    pub source: String,
    /// Set if any parameter describing the signal timing is present. Without timing,
    /// the remote can only be used with drivers which decode in hardware (lirccode).
    pub timing_info: bool,
}

bitflags! {
    /// The flags lircd knows about
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
    pub struct Flags: u32 {
        const RAW_CODES = 0x0001;
        const RC5 = 0x0002;
        const SHIFT_ENC = 0x0002;
        const RC6 = 0x0004;
        const RCMM = 0x0008;
        const SPACE_ENC = 0x0010;
        const SPACE_FIRST = 0x0020;
        const GRUNDIG = 0x0040;
        const BO = 0x0080;
        const SERIAL = 0x0100;
        const XMP = 0x0400;
        const REVERSE = 0x0800;
        const NO_HEAD_REP = 0x1000;
        const NO_FOOT_REP = 0x2000;
        const CONST_LENGTH = 0x4000;
        const REPEAT_HEADER = 0x8000;
    }
}

const DEFAULT_FREQUENCY: u64 = 38000;

impl Remote {
    /// Convert the flags to the lircd flag set. Unknown flags are reported and ignored.
    pub fn flag_bits(&self) -> Flags {
        let mut flags = Flags::empty();

        for flag in &self.flags {
            match Flags::from_name(&flag.to_ascii_uppercase()) {
                Some(bit) => flags |= bit,
                None => warn!("{}: remote {}: unknown flag {flag}", self.source, self.name),
            }
        }

        flags
    }

    pub fn unary_parameter(&self, name: &str) -> Option<u64> {
        self.unary.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn binary_parameter(&self, name: &str) -> Option<(u64, u64)> {
        self.binary.get(&name.to_ascii_lowercase()).copied()
    }

    /// Carrier frequency in Hz; lircd assumes 38kHz if none is given
    pub fn frequency(&self) -> u64 {
        self.unary_parameter("frequency").unwrap_or(DEFAULT_FREQUENCY)
    }

    /// Was the code section of this remote `begin raw_codes`
    pub fn is_raw(&self) -> bool {
        self.commands.first().is_some_and(Command::is_raw)
    }
}
