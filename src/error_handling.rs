use std::path::PathBuf;
use std::fmt::Display;

pub trait ErrorType: Display + PartialEq {}

#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize
}

impl Location {
    // A location for rules that did not come from a file (inline `--rule`s)
    pub fn inline(line: usize) -> Self {
        Location {
            file: PathBuf::from("<rule>"),
            line
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

pub type Errors<T> = Vec<Error<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        let file_only = Location { file: PathBuf::from("g.bnf"), line: 0 };
        let with_line = Location { file: PathBuf::from("g.bnf"), line: 4 };

        assert_eq!(file_only.to_string(), "g.bnf");
        assert_eq!(with_line.to_string(), "g.bnf:4");
        assert_eq!(Location::inline(2).to_string(), "<rule>:2");
    }
}
