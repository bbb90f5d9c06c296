use color_print::cprintln;
use num_enum::TryFromPrimitive;

use crate::include::Sources;
use crate::token::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, TryFromPrimitive)]
#[repr(u8)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Diag = 3,
}

#[derive(Debug, Clone)]
pub struct Msg {
    pub level: Level,
    pub text: String,
    pub pos: Option<Pos>,
}

impl Msg {
    pub fn print(&self, sources: &Sources) {
        match self.level {
            Level::Error => cprintln!("<red,bold>error</>: {}", self.text),
            Level::Warn => cprintln!("<yellow,bold>warn</>: {}", self.text),
            Level::Info => cprintln!("<green,bold>info</>: {}", self.text),
            Level::Diag => cprintln!("<cyan>diag</>: {}", self.text),
        }
        // Only warnings get the source excerpt; diag output is one line per token
        if let (Level::Warn, Some(pos)) = (self.level, &self.pos) {
            let raw = sources
                .get(&pos.file)
                .and_then(|lines| lines.get(pos.line))
                .map(|s| s.as_str())
                .unwrap_or("");
            cprintln!("     <blue>--></> <underline>{}</>", pos);
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", pos.line + 1, raw);
            cprintln!("      <blue>|</>");
        }
    }
}

/// Messages recorded during one run, printed by the caller.
#[derive(Debug, Default, Clone)]
pub struct Log(Vec<Msg>);

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: Level, text: impl Into<String>, pos: Option<&Pos>) {
        self.0.push(Msg {
            level,
            text: text.into(),
            pos: pos.cloned(),
        });
    }

    pub fn warn(&mut self, text: impl Into<String>, pos: &Pos) {
        self.push(Level::Warn, text, Some(pos));
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Level::Info, text, None);
    }

    pub fn diag(&mut self, text: impl Into<String>, pos: &Pos) {
        self.push(Level::Diag, text, Some(pos));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Messages at `max` or more important.
    pub fn filter(&self, max: Level) -> impl Iterator<Item = &Msg> {
        self.0.iter().filter(move |msg| msg.level <= max)
    }

    pub fn print(&self, max: Level, sources: &Sources) {
        for msg in self.filter(max) {
            msg.print(sources);
        }
    }
}
