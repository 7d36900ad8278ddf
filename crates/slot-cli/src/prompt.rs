//! Interactive prompts.
//!
//! Both prompts keep asking until they get a valid answer. They read from any
//! `BufRead` and write to any `Write`, so the binary wires them to stdin and
//! stderr while tests feed them canned input.

use std::io::{self, BufRead, Write};

use slot_engine::MeetingType;

/// Ask a `y`/`n` question. Empty input picks `default` when there is one.
pub fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: Option<bool>,
) -> io::Result<bool> {
    let yes = if default == Some(true) { "Y" } else { "y" };
    let no = if default == Some(false) { "N" } else { "n" };
    loop {
        write!(output, "({}/{}) {}", yes, no, prompt)?;
        output.flush()?;

        let answer = read_answer(input)?;
        match (answer.as_str(), default) {
            ("", Some(value)) => return Ok(value),
            ("y", _) => return Ok(true),
            ("n", _) => return Ok(false),
            _ => writeln!(output, "invalid -- you must type 'y' or 'n'")?,
        }
    }
}

/// Ask which meeting preset to size the slots for.
pub fn ask_meeting_type<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<MeetingType> {
    loop {
        write!(
            output,
            "Meeting type (1: {}, 2: {}): ",
            MeetingType::Lesson,
            MeetingType::Meeting
        )?;
        output.flush()?;

        let answer = read_answer(input)?;
        match answer.as_str() {
            "1" => return Ok(MeetingType::Lesson),
            "2" => return Ok(MeetingType::Meeting),
            _ => writeln!(output, "Invalid meeting type")?,
        }
    }
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before an answer was given",
        ));
    }
    Ok(line.trim().to_string())
}
