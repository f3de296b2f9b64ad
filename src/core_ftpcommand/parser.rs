/// One parsed control line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub argument: Option<String>,
}

/// Splits a control line on its first whitespace run. The verb is upper-cased,
/// the remainder is kept verbatim apart from trimming. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    if line.trim().is_empty() {
        return None;
    }

    let (verb, rest) = match line.find(char::is_whitespace) {
        Some(index) => (&line[..index], Some(&line[index..])),
        None => (line, None),
    };

    let argument = rest
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string);

    Some(Command {
        verb: verb.to_ascii_uppercase(),
        argument,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_only() {
        let command = parse_command("pwd\r\n").unwrap();
        assert_eq!(command.verb, "PWD");
        assert_eq!(command.argument, None);
    }

    #[test]
    fn test_argument_keeps_inner_whitespace() {
        let command = parse_command("STOR my  holiday photo.jpg \r\n").unwrap();
        assert_eq!(command.verb, "STOR");
        assert_eq!(command.argument.as_deref(), Some("my  holiday photo.jpg"));
    }

    #[test]
    fn test_first_whitespace_run_is_the_separator() {
        let command = parse_command("CWD \t  docs\n").unwrap();
        assert_eq!(command.argument.as_deref(), Some("docs"));
    }

    #[test]
    fn test_blank_lines_yield_nothing() {
        assert!(parse_command("").is_none());
        assert!(parse_command("\r\n").is_none());
        assert!(parse_command("   \t \r\n").is_none());
    }

    #[test]
    fn test_blank_argument_is_absent() {
        let command = parse_command("USER   \r\n").unwrap();
        assert_eq!(command.verb, "USER");
        assert!(command.argument.is_none());
    }
}
