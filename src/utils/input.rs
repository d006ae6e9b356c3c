use std::io;
use std::io::Write;

use rpassword::read_password;

pub fn input(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}

pub fn input_password(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    read_password().unwrap_or_default().trim().to_string()
}
