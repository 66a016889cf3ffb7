/// The "which do you prefer?" question put to the user on the terminal.
use std::io::{self, BufRead, Write};

/// A user's reply to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Option 1 is preferred.
    First,
    /// Option 2 is preferred.
    Second,
    /// Leave option 1 (or 2) out of the ranking, e.g. "haven't seen it".
    IgnoreFirst,
    IgnoreSecond,
    Quit,
}

/// Parse one line of input. `None` for anything unrecognised.
pub fn parse_answer(line: &str) -> Option<Answer> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" => Some(Answer::First),
        "2" => Some(Answer::Second),
        "i1" | "x1" => Some(Answer::IgnoreFirst),
        "i2" | "x2" => Some(Answer::IgnoreSecond),
        "q" | "quit" => Some(Answer::Quit),
        _ => None,
    }
}

pub fn build_question(option1: &str, option2: &str, remaining: usize) -> String {
    format!(
        "Which do you prefer? (at most {remaining} questions left)\n\
         \x20 1) {option1}\n\
         \x20 2) {option2}\n\
         [1/2, i1/i2 to ignore an item, q to quit] > "
    )
}

/// Ask until a valid answer is given. End of input counts as quitting.
pub fn ask(
    option1: &str,
    option2: &str,
    remaining: usize,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Answer> {
    let question = build_question(option1, option2, remaining);
    loop {
        write!(output, "{question}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Answer::Quit);
        }
        match parse_answer(&line) {
            Some(answer) => return Ok(answer),
            None => writeln!(output, "Please answer 1, 2, i1, i2 or q.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("1\n"), Some(Answer::First));
        assert_eq!(parse_answer(" 2 "), Some(Answer::Second));
        assert_eq!(parse_answer("I1"), Some(Answer::IgnoreFirst));
        assert_eq!(parse_answer("x2"), Some(Answer::IgnoreSecond));
        assert_eq!(parse_answer("quit"), Some(Answer::Quit));
        assert_eq!(parse_answer("3"), None);
        assert_eq!(parse_answer(""), None);
    }

    #[test]
    fn test_build_question_contains_both_options() {
        let q = build_question("Alien", "Heat", 5);
        assert!(q.contains("1) Alien"));
        assert!(q.contains("2) Heat"));
        assert!(q.contains("at most 5"));
    }

    #[test]
    fn test_ask_retries_until_valid() {
        let mut input = io::Cursor::new("maybe\n2\n");
        let mut output = Vec::new();
        let answer = ask("Alien", "Heat", 1, &mut input, &mut output).unwrap();
        assert_eq!(answer, Answer::Second);

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Which do you prefer?").count(), 2);
        assert!(text.contains("Please answer"));
    }

    #[test]
    fn test_ask_end_of_input_quits() {
        let mut input = io::Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(ask("A", "B", 1, &mut input, &mut output).unwrap(), Answer::Quit);
    }
}
