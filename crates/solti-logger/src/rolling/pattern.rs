use std::{fmt::Write as _, path::PathBuf};

use time::OffsetDateTime;

use crate::error::LoggerError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

/// File name template with strftime-like conversions.
///
/// Supported: `%Y %m %d %H %M %S` and `%%` for a literal percent sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    pieces: Vec<Piece>,
}

impl Pattern {
    pub fn parse(source: &str) -> Result<Self, LoggerError> {
        let invalid = |reason: String| LoggerError::InvalidPattern {
            pattern: source.to_string(),
            reason,
        };

        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let piece = match chars.next() {
                Some('%') => {
                    literal.push('%');
                    continue;
                }
                Some('Y') => Piece::Year,
                Some('m') => Piece::Month,
                Some('d') => Piece::Day,
                Some('H') => Piece::Hour,
                Some('M') => Piece::Minute,
                Some('S') => Piece::Second,
                Some(other) => return Err(invalid(format!("unsupported conversion %{other}"))),
                None => return Err(invalid("dangling '%' at the end".to_string())),
            };
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(piece);
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        if pieces.iter().all(|p| matches!(p, Piece::Literal(_))) {
            return Err(invalid("no time conversion in pattern".to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            pieces,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn format(&self, at: OffsetDateTime) -> String {
        let mut out = String::with_capacity(self.source.len() + 8);
        for piece in &self.pieces {
            let _ = match piece {
                Piece::Literal(s) => {
                    out.push_str(s);
                    Ok(())
                }
                Piece::Year => write!(out, "{:04}", at.year()),
                Piece::Month => write!(out, "{:02}", u8::from(at.month())),
                Piece::Day => write!(out, "{:02}", at.day()),
                Piece::Hour => write!(out, "{:02}", at.hour()),
                Piece::Minute => write!(out, "{:02}", at.minute()),
                Piece::Second => write!(out, "{:02}", at.second()),
            };
        }
        out
    }

    pub fn path_for(&self, at: OffsetDateTime) -> PathBuf {
        PathBuf::from(self.format(at))
    }

    /// Glob matching every file this pattern can produce.
    pub fn glob(&self) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(s) => out.push_str(&glob::Pattern::escape(s)),
                _ if out.ends_with('*') => {}
                _ => out.push('*'),
            }
        }
        out
    }
}
