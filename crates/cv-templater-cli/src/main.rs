use std::process;

fn main() {
    match cv_templater_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("cv-templater error: {err:#}");
            process::exit(1);
        }
    }
}
