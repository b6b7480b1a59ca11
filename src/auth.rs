use anyhow::{Result, bail};
use std::env::{self, VarError};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "PWSEAL_PASSWORD";

/// Reads the password from, in order: `PWSEAL_PASSWORD`, piped stdin, or an
/// interactive prompt. `confirm` asks twice on a terminal.
///
/// Empty passwords are rejected whatever the source.
pub fn read_password(confirm: bool) -> Result<Zeroizing<String>> {
    //  PWSEAL_PASSWORD="supersecret" pwseal encrypt report.pdf
    if let Some(pw) = from_env(env::var(PASSWORD_ENV))? {
        return non_empty(pw);
    }

    //  printf "%s" "$PW" | pwseal decrypt report.pdf.sealed
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut pw = Zeroizing::new(String::new());
        stdin.lock().read_line(&mut pw)?;
        trim_newline(&mut pw);
        return non_empty(pw);
    }

    let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
    let pw = non_empty(pw)?;

    if confirm {
        let again = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);
        if *pw != *again {
            bail!("passwords do not match");
        }
    }

    Ok(pw)
}

/// A set but non-UTF-8 variable is an error, not a fallthrough to the prompt.
fn from_env(var: Result<String, VarError>) -> Result<Option<Zeroizing<String>>> {
    match var {
        Ok(pw) => Ok(Some(Zeroizing::new(pw))),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => bail!("{PASSWORD_ENV} is not valid UTF-8"),
    }
}

fn non_empty(pw: Zeroizing<String>) -> Result<Zeroizing<String>> {
    if pw.is_empty() {
        bail!("password cannot be empty");
    }
    Ok(pw)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_only_line_endings() {
        let mut s = String::from(" pw \r\n");
        trim_newline(&mut s);
        assert_eq!(s, " pw ");
    }

    #[test]
    fn env_password_sources() {
        assert_eq!(*from_env(Ok("pw".into())).unwrap().unwrap(), "pw");
        assert!(from_env(Err(VarError::NotPresent)).unwrap().is_none());

        let err = from_env(Err(VarError::NotUnicode("pw".into()))).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(non_empty(Zeroizing::new(String::new())).is_err());
        assert_eq!(*non_empty(Zeroizing::new("x".into())).unwrap(), "x");
    }
}
