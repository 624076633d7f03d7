use verbatim::presentation::{Environment, UnknownEnvironment};

#[test]
fn given_known_names_when_parsing_then_matches_case_insensitively() {
    assert_eq!("Local".parse(), Ok(Environment::Local));
    assert_eq!(" test ".parse(), Ok(Environment::Test));
    assert_eq!("PRODUCTION".parse(), Ok(Environment::Prod));
}

#[test]
fn given_unknown_name_when_parsing_then_error_names_the_input() {
    let err = "staging".parse::<Environment>().unwrap_err();

    assert_eq!(err, UnknownEnvironment("staging".to_string()));
    assert!(err.to_string().contains("staging"));
}

#[test]
fn given_environment_when_naming_settings_file_then_uses_lowercase_name() {
    assert_eq!(Environment::Prod.settings_file(), "appsettings.prod");
    assert_eq!(Environment::default().to_string(), "local");
}
