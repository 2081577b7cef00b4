use std::io::{self, BufRead, Lines};

/// Outcome of a parse step which did not produce a value
#[derive(Debug)]
pub(super) enum ParseError {
    /// The current line is not what the grammar expects. The line is not consumed
    Mismatch,
    /// No more lines
    EndOfInput,
    Io(io::Error),
}

pub(super) type ParseResult<T> = Result<T, ParseError>;

/// Reads a lircd.conf file line by line. A line is fetched once and stays current until
/// it is consumed, so a parse function can look at a line and leave it for another
/// parse function if it does not match.
pub(super) struct LineCursor<R> {
    lines: Lines<R>,
    line_no: usize,
    current: Option<Vec<String>>,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        LineCursor {
            lines: reader.lines(),
            line_no: 0,
            current: None,
        }
    }

    /// Line number of the last line read
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Tokens of the current line. Comments and blank lines are skipped, so the
    /// result is never empty.
    pub fn peek(&mut self) -> ParseResult<&[String]> {
        let words = match self.current.take() {
            Some(words) => words,
            None => self.read_words()?,
        };

        Ok(self.current.insert(words).as_slice())
    }

    pub fn consume(&mut self) {
        self.current = None;
    }

    /// Does the current line consist of exactly these keywords. Nothing is consumed.
    pub fn matches(&mut self, tokens: &[&str]) -> ParseResult<bool> {
        let words = self.peek()?;

        Ok(words.len() == tokens.len()
            && words
                .iter()
                .zip(tokens)
                .all(|(word, token)| word.eq_ignore_ascii_case(token)))
    }

    /// Consume the current line if it is exactly these keywords, else fail without
    /// consuming it.
    pub fn require(&mut self, tokens: &[&str]) -> ParseResult<()> {
        if self.matches(tokens)? {
            self.consume();
            Ok(())
        } else {
            Err(ParseError::Mismatch)
        }
    }

    /// Consume lines up to and including the first line which is exactly these keywords.
    pub fn seek(&mut self, tokens: &[&str]) -> ParseResult<()> {
        loop {
            let found = self.matches(tokens)?;

            self.consume();

            if found {
                return Ok(());
            }
        }
    }

    fn read_words(&mut self) -> ParseResult<Vec<String>> {
        loop {
            let Some(line) = self.lines.next() else {
                return Err(ParseError::EndOfInput);
            };

            let line = line.map_err(ParseError::Io)?;

            self.line_no += 1;

            let content = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line.as_str(),
            };

            let words: Vec<String> = content.split_whitespace().map(str::to_owned).collect();

            if !words.is_empty() {
                return Ok(words);
            }
        }
    }
}
