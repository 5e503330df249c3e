use std::io::{self, BufRead, Write};

use crate::{
    choice::{parse_choice, Shape},
    options::{OptSpec, OptValue},
};

/// Line-based question/answer over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Print `prompt` and read one line. End of input reads as an empty answer.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask for `spec.key`, validated against its shape.
    pub fn ask_choice(&mut self, label: &str, spec: &OptSpec) -> io::Result<OptValue> {
        let answer = self.ask(&format!("{} [{}]: ", label, choice_hint(spec)))?;
        Ok(parse_choice(&answer, &spec.shape, spec.default.clone()))
    }

    pub fn ask_yes_no(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        let answer = self.ask(prompt)?;
        Ok(match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }
}

/// Accepted values with the default marked by `^`.
pub fn choice_hint(spec: &OptSpec) -> String {
    let default = spec.default.to_string();
    match &spec.shape {
        Shape::OneOf(opts) => opts
            .iter()
            .map(|&o| {
                if o == default {
                    format!("^{o}")
                } else {
                    o.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("/"),
        range => format!("{range}, ^{default}"),
    }
}
