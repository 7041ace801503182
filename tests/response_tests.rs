use printbot::core::models::CallbackMessage;
use printbot::slack::response_builder::{create_artwork_payload, create_text_payload};

#[test]
fn test_text_payload() {
    let payload = create_text_payload("Processing your file for printing...");
    assert_eq!(
        serde_json::to_string(&payload).unwrap(),
        r#"{"text":"Processing your file for printing..."}"#
    );
}

#[test]
fn test_artwork_payload() {
    let payload = create_artwork_payload("https://img.example/a.png");

    assert_eq!(payload["response_type"], "in_channel");
    assert_eq!(payload["text"], "Here is your artwork:");
    let attachment = &payload["attachments"][0];
    assert_eq!(attachment["fallback"], "Your generated artwork");
    assert_eq!(attachment["image_url"], "https://img.example/a.png");
    assert_eq!(attachment["title"], "Generated Artwork");
    assert_eq!(attachment["text"], "Enjoy your custom creation!");
}

#[test]
fn test_callback_message_wraps_payloads() {
    let art = CallbackMessage::artwork("https://img.example/a.png");
    assert_eq!(art.text_content(), Some("Here is your artwork:"));
    assert_eq!(art.payload()["attachments"].as_array().map(Vec::len), Some(1));
}
