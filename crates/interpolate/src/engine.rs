use std::{io, mem};

use {
    tracing::{debug, trace, warn},
    unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory},
};

use crate::{
    error::InterpolateError,
    io::{CharSink, CharSource},
    policy::UndefinedPolicy,
    resolver::Resolver,
};

/// Whether `ch` may appear in a variable name: a letter (general category
/// `L*`), a decimal digit (`Nd`) or underscore.
pub fn is_name_char(ch: char) -> bool {
    ch == '_'
        || ch.general_category_group() == GeneralCategoryGroup::Letter
        || ch.general_category() == GeneralCategory::DecimalNumber
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    /// After `$`, collecting `NAME`.
    BareName,
    /// After `${`, collecting `NAME` until `}`.
    BracedName,
}

/// How a pending reference ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    /// Closing `}` for braced names; any non-name character or end of input
    /// for bare names.
    Complete,
    /// Braced name cut off before its `}`.
    Incomplete,
}

/// Counters for one run. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub chars_read: u64,
    pub resolved: u64,
    pub undefined: u64,
}

/// Character-driven substitution state machine.
///
/// Feed characters with [`process_char`](Self::process_char) and call
/// [`finish`](Self::finish) once the input is exhausted.
pub struct Interpolator<'r, R: ?Sized> {
    resolver: &'r R,
    policy: UndefinedPolicy,
    state: State,
    name: String,
    stats: RunStats,
}

impl<'r, R: Resolver + ?Sized> Interpolator<'r, R> {
    pub fn new(resolver: &'r R, policy: UndefinedPolicy) -> Self {
        Self {
            resolver,
            policy,
            state: State::Literal,
            name: String::new(),
            stats: RunStats::default(),
        }
    }

    pub fn process_char<S: CharSink + ?Sized>(&mut self, ch: char, sink: &mut S) -> io::Result<()> {
        self.stats.chars_read += 1;
        match self.state {
            State::Literal => self.literal(ch, sink),
            State::BareName => {
                if is_name_char(ch) {
                    self.name.push(ch);
                    Ok(())
                } else if ch == '{' && self.name.is_empty() {
                    self.state = State::BracedName;
                    Ok(())
                } else {
                    self.flush(Termination::Complete, sink)?;
                    self.literal(ch, sink)
                }
            },
            State::BracedName => {
                if is_name_char(ch) {
                    self.name.push(ch);
                    Ok(())
                } else if ch == '}' {
                    self.flush(Termination::Complete, sink)
                } else {
                    self.flush(Termination::Incomplete, sink)?;
                    self.literal(ch, sink)
                }
            },
        }
    }

    /// Drains any pending reference at end of input and returns the counters.
    pub fn finish<S: CharSink + ?Sized>(mut self, sink: &mut S) -> io::Result<RunStats> {
        match self.state {
            State::Literal => {},
            State::BareName => self.flush(Termination::Complete, sink)?,
            State::BracedName => self.flush(Termination::Incomplete, sink)?,
        }
        Ok(self.stats)
    }

    fn literal<S: CharSink + ?Sized>(&mut self, ch: char, sink: &mut S) -> io::Result<()> {
        if ch == '$' {
            self.state = State::BareName;
            Ok(())
        } else {
            sink.write_char(ch)
        }
    }

    fn flush<S: CharSink + ?Sized>(
        &mut self,
        termination: Termination,
        sink: &mut S,
    ) -> io::Result<()> {
        let state = mem::replace(&mut self.state, State::Literal);
        let result = match (state, termination) {
            (State::Literal, _) => Ok(()),
            (State::BareName, _) if self.name.is_empty() => sink.write_char('$'),
            (State::BracedName, Termination::Complete) if self.name.is_empty() => {
                sink.write_str("${}")
            },
            (State::BracedName, Termination::Incomplete) => {
                sink.write_str("${").and_then(|()| sink.write_str(&self.name))
            },
            (State::BareName, _) => self.substitute(false, sink),
            (State::BracedName, Termination::Complete) => self.substitute(true, sink),
        };
        self.name.clear();
        result
    }

    fn substitute<S: CharSink + ?Sized>(&mut self, braced: bool, sink: &mut S) -> io::Result<()> {
        if let Some(value) = self.resolver.resolve(&self.name) {
            self.stats.resolved += 1;
            return sink.write_str(&value);
        }

        self.stats.undefined += 1;
        trace!(name = %self.name, policy = %self.policy, "undefined variable");
        match (self.policy, braced) {
            (UndefinedPolicy::Remove, _) => Ok(()),
            (UndefinedPolicy::Preserve, false) => {
                sink.write_char('$')?;
                sink.write_str(&self.name)
            },
            (UndefinedPolicy::Preserve, true) => {
                sink.write_str("${")?;
                sink.write_str(&self.name)?;
                sink.write_char('}')
            },
        }
    }
}

/// Substitutes every reference read from `source` and writes the result to
/// `sink`, flushing it at the end.
///
/// Stops at the first read or write failure.
pub fn run<Src, Snk, R>(
    source: &mut Src,
    sink: &mut Snk,
    resolver: &R,
    policy: UndefinedPolicy,
) -> Result<RunStats, InterpolateError>
where
    Src: CharSource + ?Sized,
    Snk: CharSink + ?Sized,
    R: Resolver + ?Sized,
{
    let mut interpolator = Interpolator::new(resolver, policy);
    while let Some(ch) = source.next_char().map_err(InterpolateError::Read)? {
        interpolator
            .process_char(ch, sink)
            .map_err(InterpolateError::Write)?;
    }
    let stats = interpolator.finish(sink).map_err(InterpolateError::Write)?;
    sink.flush().map_err(InterpolateError::Write)?;

    debug!(
        chars = stats.chars_read,
        resolved = stats.resolved,
        undefined = stats.undefined,
        %policy,
        "interpolation finished"
    );
    Ok(stats)
}

/// Runs the engine over an in-memory string.
pub fn interpolate_str<R: Resolver + ?Sized>(
    input: &str,
    resolver: &R,
    policy: UndefinedPolicy,
) -> String {
    let mut output = String::with_capacity(input.len());
    match run(&mut input.chars(), &mut output, resolver, policy) {
        Ok(_) => {},
        // Neither `Chars` nor `String` can fail; keep whatever was written.
        Err(e) => warn!(error = %e, "in-memory interpolation stopped early"),
    }
    output
}
