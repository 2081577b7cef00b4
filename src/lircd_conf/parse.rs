use super::{
    cursor::{LineCursor, ParseError, ParseResult},
    Code, Command, Remote,
};
use itertools::Itertools;
use log::{debug, info, warn};
use regex::Regex;
use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    sync::OnceLock,
};

/// Parameters which say something about the timing of the signal. A remote with none
/// of these can only be used with a lirccode driver.
const UNARY_TIMING: &[&str] = &[
    "bits",
    "plead",
    "ptrail",
    "pre_data_bits",
    "post_data_bits",
    "gap",
    "repeat_gap",
    "frequency",
    "duty_cycle",
];

const BINARY_TIMING: &[&str] = &[
    "header", "one", "zero", "two", "three", "four", "foot", "repeat", "pre", "post", "gap",
];

/// Everything in a remote block before the codes
#[derive(Default)]
struct ParameterRecord {
    name: Option<String>,
    driver: Option<String>,
    flags: Vec<String>,
    unary: BTreeMap<String, u64>,
    binary: BTreeMap<String, (u64, u64)>,
}

impl ParameterRecord {
    fn timing_info(&self) -> bool {
        UNARY_TIMING.iter().any(|name| self.unary.contains_key(*name))
            || BINARY_TIMING.iter().any(|name| self.binary.contains_key(*name))
    }

    fn into_remote(self, commands: Vec<Command>, source: &str) -> Remote {
        let timing_info = self.timing_info();

        Remote {
            name: self.name.unwrap_or_default(),
            driver: self.driver,
            flags: self.flags,
            unary: self.unary,
            binary: self.binary,
            commands,
            source: source.to_owned(),
            timing_info,
        }
    }
}

/// lircd is very forgiving about what it accepts, so a remote block which does not parse
/// is skipped rather than failing the whole file. The parser does not try to report
/// what is wrong with a block; it simply moves on to the next `end remote`.
struct LircParser<'a, R> {
    cursor: LineCursor<R>,
    source: &'a str,
}

impl<'a, R: BufRead> LircParser<'a, R> {
    fn new(reader: R, source: &'a str) -> Self {
        LircParser {
            cursor: LineCursor::new(reader),
            source,
        }
    }

    fn parse(&mut self, accept_lirc_code: bool) -> io::Result<Vec<Remote>> {
        let mut remotes = Vec::new();

        loop {
            match self.remote() {
                Ok(remote) => {
                    if remote.timing_info || accept_lirc_code {
                        debug!(
                            "{}:{}: remote {} with {} codes",
                            self.source,
                            self.cursor.line_no(),
                            remote.name,
                            remote.commands.len()
                        );
                        remotes.push(remote);
                    } else {
                        info!(
                            "{}: ignoring timingless remote {}",
                            self.source, remote.name
                        );
                    }
                }
                Err(ParseError::Mismatch) => {
                    warn!(
                        "{}:{}: cannot parse remote, skipping to 'end remote'",
                        self.source,
                        self.cursor.line_no()
                    );

                    match self.cursor.seek(&["end", "remote"]) {
                        Ok(()) => (),
                        Err(ParseError::Io(e)) => return Err(self.io_error(e)),
                        Err(_) => return Ok(remotes),
                    }
                }
                Err(ParseError::EndOfInput) => return Ok(remotes),
                Err(ParseError::Io(e)) => return Err(self.io_error(e)),
            }
        }
    }

    fn remote(&mut self) -> ParseResult<Remote> {
        self.cursor.seek(&["begin", "remote"])?;

        match self.remote_body() {
            Err(ParseError::EndOfInput) => {
                warn!(
                    "{}:{}: unexpected end of file",
                    self.source,
                    self.cursor.line_no()
                );
                Err(ParseError::EndOfInput)
            }
            res => res,
        }
    }

    fn remote_body(&mut self) -> ParseResult<Remote> {
        let parameters = self.parameters()?;
        let commands = self.codes()?;
        self.cursor.require(&["end", "remote"])?;

        if parameters.name.is_none() {
            warn!(
                "{}:{}: remote has no name",
                self.source,
                self.cursor.line_no()
            );
        }

        Ok(parameters.into_remote(commands, self.source))
    }

    /// Read parameter lines up to, but not including, the first line starting with
    /// `begin`.
    fn parameters(&mut self) -> ParseResult<ParameterRecord> {
        let mut record = ParameterRecord::default();

        loop {
            let words = self.cursor.peek()?.to_vec();

            match words[0].to_ascii_lowercase().as_str() {
                "begin" => return Ok(record),
                keyword @ ("name" | "driver") => match words.get(1) {
                    Some(value) if keyword == "name" => record.name = Some(value.to_owned()),
                    Some(value) => record.driver = Some(value.to_owned()),
                    None => warn!(
                        "{}:{}: missing {keyword} argument",
                        self.source,
                        self.cursor.line_no()
                    ),
                },
                "flags" => record.flags = split_flags(&words[1..]),
                _ => self.numeric_parameter(&words, &mut record),
            }

            self.cursor.consume();
        }
    }

    /// Parameter names are stored in lower case, so a later line wins over an earlier one
    /// whatever its case.
    fn numeric_parameter(&self, words: &[String], record: &mut ParameterRecord) {
        match words {
            [name, value] => match parse_number(value) {
                Some(value) => {
                    record.unary.insert(name.to_ascii_lowercase(), value);
                }
                None => warn!(
                    "{}:{}: {name} argument {value} is not a number",
                    self.source,
                    self.cursor.line_no()
                ),
            },
            [name, x, y] => match (parse_number(x), parse_number(y)) {
                (Some(x), Some(y)) => {
                    record.binary.insert(name.to_ascii_lowercase(), (x, y));
                }
                _ => warn!(
                    "{}:{}: {name} arguments '{x} {y}' are not numbers",
                    self.source,
                    self.cursor.line_no()
                ),
            },
            _ => warn!(
                "{}:{}: unexpected parameter '{}'",
                self.source,
                self.cursor.line_no(),
                words.join(" ")
            ),
        }
    }

    /// A code section is either `begin codes` or `begin raw_codes`, decided by the
    /// current line.
    fn codes(&mut self) -> ParseResult<Vec<Command>> {
        if self.cursor.matches(&["begin", "codes"])? {
            self.cooked_codes()
        } else {
            self.raw_codes()
        }
    }

    fn cooked_codes(&mut self) -> ParseResult<Vec<Command>> {
        self.cursor.require(&["begin", "codes"])?;

        let mut commands = Vec::new();

        loop {
            match self.cooked_code() {
                Ok(command) => commands.push(command),
                Err(ParseError::Mismatch) => break,
                Err(e) => return Err(e),
            }
        }

        self.cursor.require(&["end", "codes"])?;

        Ok(commands)
    }

    /// A line with a name followed by one or more codes. Nothing is consumed if the
    /// line does not have that shape.
    fn cooked_code(&mut self) -> ParseResult<Command> {
        if self.cursor.matches(&["end", "codes"])? {
            return Err(ParseError::Mismatch);
        }

        let words = self.cursor.peek()?;

        let Some((name, codes)) = words.split_first() else {
            return Err(ParseError::Mismatch);
        };

        if codes.is_empty() {
            return Err(ParseError::Mismatch);
        }

        let Some(codes) = codes
            .iter()
            .map(|code| parse_number(code))
            .collect::<Option<Vec<_>>>()
        else {
            return Err(ParseError::Mismatch);
        };

        let command = Command {
            name: name.to_owned(),
            code: Code::Cooked(codes),
        };

        self.cursor.consume();

        Ok(command)
    }

    fn raw_codes(&mut self) -> ParseResult<Vec<Command>> {
        self.cursor.require(&["begin", "raw_codes"])?;

        let mut commands = Vec::new();

        loop {
            match self.raw_code() {
                Ok(command) => commands.push(command),
                Err(ParseError::Mismatch) => break,
                Err(e) => return Err(e),
            }
        }

        self.cursor.require(&["end", "raw_codes"])?;

        Ok(commands)
    }

    /// A `name` line followed by lines of durations. Nothing is consumed if the current
    /// line is not a `name` line.
    fn raw_code(&mut self) -> ParseResult<Command> {
        let words = self.cursor.peek()?.to_vec();

        if words.len() < 2 || !words[0].eq_ignore_ascii_case("name") {
            return Err(ParseError::Mismatch);
        }

        self.cursor.consume();

        let name = words[1].to_owned();
        let mut durations = Vec::new();

        self.durations(&words[2..], &mut durations);

        loop {
            let words = self.cursor.peek()?.to_vec();

            // the next name or end raw_codes
            if words[0].parse::<u32>().is_err() {
                break;
            }

            self.durations(&words, &mut durations);

            self.cursor.consume();
        }

        Ok(Command {
            name,
            code: Code::Raw {
                durations,
                toggle: 0,
            },
        })
    }

    /// Append a line of durations. If any of them is not a number, the entire line is
    /// ignored.
    fn durations(&self, words: &[String], durations: &mut Vec<u32>) {
        match words.iter().map(|w| w.parse::<u32>()).collect::<Result<Vec<_>, _>>() {
            Ok(line) => durations.extend(line),
            Err(e) => warn!(
                "{}:{}: ignoring durations '{}': {e}",
                self.source,
                self.cursor.line_no(),
                words.join(" ")
            ),
        }
    }

    fn io_error(&self, e: io::Error) -> io::Error {
        io::Error::new(
            e.kind(),
            format!("{}:{}: {e}", self.source, self.cursor.line_no()),
        )
    }
}

/// The flags line is `flags A|B|C`, where whitespace around the `|` is permitted.
fn split_flags(words: &[String]) -> Vec<String> {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();

    let separator = SEPARATOR.get_or_init(|| Regex::new(r"\s*\|\s*").expect("valid regex"));

    separator
        .split(&words.iter().join(" "))
        .filter(|flag| !flag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a number the way lircd does: decimal, hexadecimal with a `0x` prefix or octal
/// with a leading `0`, with an optional sign. Like `strtoull`, negative numbers wrap.
pub fn parse_number(s: &str) -> Option<u64> {
    let (negative, digits) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };

    let (digits, radix) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (hex, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (&digits[1..], 8)
    } else {
        (digits, 10)
    };

    // from_str_radix permits a sign of its own
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let value = u64::from_str_radix(digits, radix).ok()?;

    Some(if negative { value.wrapping_neg() } else { value })
}

/// Parse lircd.conf contents from a reader. The source is recorded in every remote. Remotes
/// without timing information are dropped unless `accept_lirc_code` is set.
pub fn parse_reader<R: BufRead>(
    reader: R,
    source: &str,
    accept_lirc_code: bool,
) -> io::Result<Vec<Remote>> {
    LircParser::new(reader, source).parse(accept_lirc_code)
}

/// Read a lircd.conf file at the path specified. Such a file may contain multiple
/// remotes. Any parse errors or warnings are sent to the log crate.
pub fn parse<P: AsRef<Path>>(path: P, accept_lirc_code: bool) -> io::Result<Vec<Remote>> {
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;

    let source = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string();

    info!("parsing '{source}' as lircd.conf file");

    parse_reader(BufReader::new(file), &source, accept_lirc_code)
}
