use printbot::slack::command_parser::{decode_url_component, parse_form_data};

#[test]
fn test_decode_url_component() {
    assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
    assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
    assert_eq!(
        decode_url_component("test%40example.com%26param%3Dvalue").unwrap(),
        "test@example.com&param=value"
    );
    // An encoded plus stays a plus
    assert_eq!(decode_url_component("c%2B%2B").unwrap(), "c++");
}

#[test]
fn test_parse_form_data_success() {
    let form_data = "token=abc123&team_id=T123&team_domain=example&\
                    channel_id=C123&channel_name=general&user_id=U123&\
                    user_name=ada&command=%2Fprint_translate&\
                    text=file_name%3Areport.pdf+language%3AFrench&\
                    response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1&\
                    trigger_id=123.456";

    let event = parse_form_data(form_data).unwrap();

    assert_eq!(event.team_id, "T123");
    assert_eq!(event.channel_id, "C123");
    assert_eq!(event.user_id, "U123");
    assert_eq!(event.user_name, "ada");
    assert_eq!(event.command, "/print_translate");
    assert_eq!(event.text, "file_name:report.pdf language:French");
    assert_eq!(event.response_url, "https://hooks.slack.com/commands/1");
    assert_eq!(event.trigger_id, "123.456");
}

#[test]
fn test_parse_form_data_missing_fields_default_to_empty() {
    let event = parse_form_data("text=hello").unwrap();
    assert_eq!(event.text, "hello");
    assert_eq!(event.response_url, "");

    let event = parse_form_data("").unwrap();
    assert_eq!(event.text, "");
}

#[test]
fn test_parse_form_data_rejects_non_form_bodies() {
    assert!(parse_form_data("{\"text\": \"hi\"}").is_err());
    assert!(parse_form_data("text=%FF").is_err());
}
