use clap_complete::shells;
use super::CommandError;
use crate::STDRESULT;

pub fn generate(mut main_cmd: clap::Command,cmd: &clap::ArgMatches) -> STDRESULT {
    let shell = match cmd.get_one::<String>("shell") {
        Some(s) => s.as_str(),
        None => return Err(Box::new(CommandError::InvalidCommand))
    };
    let out = &mut std::io::stdout();
    match shell {
        "bash" => clap_complete::generate(shells::Bash,&mut main_cmd,"integerbasic",out),
        "elv" => clap_complete::generate(shells::Elvish,&mut main_cmd,"integerbasic",out),
        "fish" => clap_complete::generate(shells::Fish,&mut main_cmd,"integerbasic",out),
        "ps1" => clap_complete::generate(shells::PowerShell,&mut main_cmd,"integerbasic",out),
        "zsh" => clap_complete::generate(shells::Zsh,&mut main_cmd,"integerbasic",out),
        _ => return Err(Box::new(CommandError::InvalidCommand))
    }
    Ok(())
}
