//! FormattedWriter implementations for config files and help output

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::domain::ports::{FormattedWriter, SectionLevel};

/// Writes lines and drops empty lines until the first non-empty one
#[derive(Debug)]
struct LineSink<W> {
    out: W,
    at_start: bool,
}

impl<W: Write> LineSink<W> {
    fn new(out: W) -> Self {
        Self { out, at_start: true }
    }

    fn write_raw(&mut self, line: &str) -> io::Result<()> {
        if self.at_start && line.is_empty() {
            return Ok(());
        }
        self.at_start = false;
        writeln!(self.out, "{line}")
    }
}

fn underline(c: char, heading: &str) -> String {
    c.to_string().repeat(heading.width())
}

/// Writes help as comments and commands verbatim, the output can be loaded again
#[derive(Debug)]
pub struct ConfigFileWriter<W> {
    sink: LineSink<W>,
    prefix: String,
}

impl<W: Write> ConfigFileWriter<W> {
    /// Comment lines start with `# `
    pub fn new(out: W) -> Self {
        Self::with_prefix(out, "# ")
    }

    pub fn with_prefix(out: W, prefix: impl Into<String>) -> Self {
        Self {
            sink: LineSink::new(out),
            prefix: prefix.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.sink.out
    }
}

impl<W: Write> FormattedWriter for ConfigFileWriter<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        if line.is_empty() {
            self.sink.write_raw(line)
        } else {
            let line = format!("{}{}", self.prefix, line);
            self.sink.write_raw(&line)
        }
    }

    fn write_heading(&mut self, level: SectionLevel, heading: &str) -> io::Result<()> {
        match level {
            SectionLevel::Section => {
                let rule = underline('=', heading);
                self.write_line("")?;
                self.write_line("")?;
                self.write_line(&rule)?;
                self.write_line(heading)?;
                self.write_line(&rule)
            }
            SectionLevel::SubSection => {
                self.write_line("")?;
                self.write_line(heading)?;
                self.write_line(&underline('-', heading))
            }
        }
    }

    fn write_command(&mut self, cmd: &str) -> io::Result<()> {
        self.sink.write_raw(cmd)
    }
}

/// Writes help as plain text, commands are dropped
#[derive(Debug)]
pub struct HelpWriter<W> {
    sink: LineSink<W>,
}

impl<W: Write> HelpWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            sink: LineSink::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.sink.out
    }
}

impl<W: Write> FormattedWriter for HelpWriter<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.sink.write_raw(line)
    }

    fn write_heading(&mut self, level: SectionLevel, heading: &str) -> io::Result<()> {
        let c = match level {
            SectionLevel::Section => '=',
            SectionLevel::SubSection => '-',
        };
        self.write_line("")?;
        self.write_line(heading)?;
        self.write_line(&underline(c, heading))
    }

    fn write_command(&mut self, _cmd: &str) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_output(f: impl FnOnce(&mut ConfigFileWriter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut w = ConfigFileWriter::new(Vec::new());
        f(&mut w).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn config_writer_drops_leading_empty_lines() {
        let out = config_output(|w| {
            w.write_heading(SectionLevel::Section, "Settings")?;
            w.write_line("")?;
            w.write_command("set a = 1")
        });
        assert_eq!(out, "# ========\n# Settings\n# ========\n\nset a = 1\n");
    }

    #[test]
    fn config_writer_subsection() {
        let out = config_output(|w| {
            w.write_command("set a = 1")?;
            w.write_heading(SectionLevel::SubSection, "ui.width")?;
            w.write_lines("an int\nwidth of the window")
        });
        assert_eq!(
            out,
            "set a = 1\n\n# ui.width\n# --------\n# an int\n# width of the window\n"
        );
    }

    #[test]
    fn underline_uses_display_width() {
        let out = config_output(|w| w.write_heading(SectionLevel::SubSection, "Größe"));
        assert_eq!(out, "# Größe\n# -----\n");
    }

    #[test]
    fn help_writer_ignores_commands() {
        let mut w = HelpWriter::new(Vec::new());
        w.write_heading(SectionLevel::Section, "set").unwrap();
        w.write_command("set a = 1").unwrap();
        w.write_heading(SectionLevel::SubSection, "data types").unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(out, "set\n===\n\ndata types\n----------\n");
    }
}
