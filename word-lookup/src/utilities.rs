use std::io::{self, Write};

pub fn input(prompt: &str) -> io::Result<String> {
    let mut line = String::new();
    print!("{prompt}");
    io::stdout().flush()?;
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

pub fn str_to_bool(mut str: String) -> Option<bool> {
    str.make_ascii_lowercase();
    match str.trim() {
        "y" | "yes" | "yeah" | "yea" | "true" | "on" => Some(true),
        "n" | "no" | "nope" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Joins the words following a command back into a single term.
pub fn rest_of_line<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<&str>>().join(" ")
}

/// One line typed at the interactive prompt.
#[derive(Debug, PartialEq)]
pub enum Prompt {
    Quit,
    Remove(String),
    Search(String),
    Help,
    Invalid(String),
}

/// Commands start with `:`, anything else is a word to look up.
pub fn parse_prompt(line: &str) -> Prompt {
    let line = line.trim();
    let Some(command_line) = line.strip_prefix(':') else {
        return Prompt::Search(rest_of_line(line.split_ascii_whitespace()));
    };

    let mut command_parts = command_line.split_ascii_whitespace();
    match command_parts.next() {
        Some("exit" | "leave" | "quit" | "e" | "q" | "l") => Prompt::Quit,
        Some("remove" | "rm") => {
            let word = rest_of_line(command_parts);
            if word.is_empty() {
                Prompt::Invalid("usage: :remove <word>".to_owned())
            } else {
                Prompt::Remove(word)
            }
        }
        Some("help" | "h") => Prompt::Help,
        Some(other) => Prompt::Invalid(format!("unknown command :{other}, try :help")),
        None => Prompt::Invalid("missing command after ':'".to_owned()),
    }
}
