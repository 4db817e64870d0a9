//! FormattedWriter port - output of saved config files and help texts

use std::io;

/// Level of a heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SectionLevel {
    /// Separates commands in the help and blocks of settings in a saved file
    Section,
    /// Subsections such as "Data types" or the help of one setting
    SubSection,
}

/// Receives help text and commands. Line wrapping happens before text reaches the writer.
pub trait FormattedWriter {
    /// Write a single line of documentation, `line` must not contain a newline.
    /// Empty lines before the first written line are dropped.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Write one or more lines of documentation
    fn write_lines(&mut self, text: &str) -> io::Result<()> {
        for line in text.lines() {
            self.write_line(line)?;
        }
        Ok(())
    }

    fn write_heading(&mut self, level: SectionLevel, heading: &str) -> io::Result<()>;

    /// Write a command which is executed when the output is loaded as a config file
    fn write_command(&mut self, cmd: &str) -> io::Result<()>;
}
