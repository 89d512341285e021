// ABOUTME: Offline container number commands.
// ABOUTME: Validates full numbers and computes check digits without a directory.

use serde::Serialize;
use yardcheck::error::{Error, Result};
use yardcheck::output::Output;
use yardcheck::types::{self, ContainerNumber};

#[derive(Serialize)]
struct Verdict<'a> {
    input: &'a str,
    number: Option<&'a ContainerNumber>,
    error: Option<String>,
}

pub fn validate(numbers: &[String], output: &Output) -> Result<()> {
    let mut invalid = 0;
    for raw in numbers {
        match ContainerNumber::parse(raw) {
            Ok(number) => output.report(
                &format!("{number}: valid"),
                &Verdict {
                    input: raw,
                    number: Some(&number),
                    error: None,
                },
            ),
            Err(e) => {
                invalid += 1;
                output.report(
                    &format!("{}: {e}", raw.trim()),
                    &Verdict {
                        input: raw,
                        number: None,
                        error: Some(e.to_string()),
                    },
                );
            }
        }
    }

    if invalid > 0 {
        return Err(Error::InvalidNumbers(invalid, numbers.len()));
    }
    Ok(())
}

pub fn check_digit(prefix: &str, output: &Output) -> Result<()> {
    let digit = types::check_digit(prefix)?;
    output.report(&digit.to_string(), &digit);
    Ok(())
}
