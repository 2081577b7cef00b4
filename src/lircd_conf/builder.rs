//! Handing parsed remotes to something which produces a device description

use super::{Code, Remote};
use serde::Serialize;
use std::collections::BTreeMap;

/// What the builder should generate besides the command names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Include the protocol parameters of each remote
    pub parameters: bool,
    /// Include the durations of raw codes
    pub raw: bool,
}

/// Converts a set of parsed remotes into some other representation
pub trait RemoteSetBuilder {
    type Output;

    fn build(&self, remotes: &[Remote], source: &str, options: GenerateOptions) -> Self::Output;
}

/// Renders remotes as a toml document
pub struct TomlSummary;

#[derive(Serialize)]
struct Document<'a> {
    source: &'a str,
    remotes: Vec<RemoteEntry<'a>>,
}

#[derive(Serialize)]
struct RemoteEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    driver: Option<&'a str>,
    source: &'a str,
    timing_info: bool,
    #[serde(skip_serializing_if = "no_flags")]
    flags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Parameters<'a>>,
    commands: Vec<CommandEntry<'a>>,
}

#[derive(Serialize)]
struct Parameters<'a> {
    unary: BTreeMap<&'a str, Value>,
    binary: BTreeMap<&'a str, [Value; 2]>,
}

#[derive(Serialize)]
struct CommandEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    toggle: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    durations: Option<&'a [u32]>,
}

fn no_flags(flags: &&[String]) -> bool {
    flags.is_empty()
}

/// toml integers are signed 64 bit
#[derive(Serialize)]
#[serde(untagged)]
enum Value {
    Integer(i64),
    Hex(String),
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Hex(format!("{v:#x}")),
        }
    }
}

impl RemoteSetBuilder for TomlSummary {
    type Output = Result<String, toml::ser::Error>;

    fn build(&self, remotes: &[Remote], source: &str, options: GenerateOptions) -> Self::Output {
        let remotes = remotes
            .iter()
            .map(|remote| {
                let parameters = options.parameters.then(|| Parameters {
                    unary: remote
                        .unary
                        .iter()
                        .map(|(name, v)| (name.as_str(), Value::from(*v)))
                        .collect(),
                    binary: remote
                        .binary
                        .iter()
                        .map(|(name, (x, y))| {
                            (name.as_str(), [Value::from(*x), Value::from(*y)])
                        })
                        .collect(),
                });

                let commands = remote
                    .commands
                    .iter()
                    .map(|command| match &command.code {
                        Code::Cooked(codes) => CommandEntry {
                            name: &command.name,
                            codes: Some(codes.iter().map(|code| format!("{code:#x}")).collect()),
                            toggle: None,
                            durations: None,
                        },
                        Code::Raw { durations, toggle } => CommandEntry {
                            name: &command.name,
                            codes: None,
                            toggle: Some(*toggle),
                            durations: options.raw.then_some(durations.as_slice()),
                        },
                    })
                    .collect();

                RemoteEntry {
                    name: &remote.name,
                    driver: remote.driver.as_deref(),
                    source: &remote.source,
                    timing_info: remote.timing_info,
                    flags: &remote.flags,
                    parameters,
                    commands,
                }
            })
            .collect();

        toml::to_string(&Document { source, remotes })
    }
}
