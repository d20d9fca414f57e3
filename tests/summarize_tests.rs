mod common;

use common::{FakeGenerator, record, sized_record};
use tg_digest::core::config::DigestConfig;
use tg_digest::core::models::ConversationBucket;
use tg_digest::errors::DigestError;
use tg_digest::worker::summarize::summarize_conversation;

fn config(char_budget: usize) -> DigestConfig {
    DigestConfig {
        char_budget,
        target_language: "English".to_string(),
        ..DigestConfig::default()
    }
}

#[tokio::test]
async fn test_single_batch_issues_exactly_one_call() {
    let bucket = ConversationBucket::new(
        "Work",
        vec![record("Ann", "deploy at 5"), record("", "channel notice")],
    );
    let generator = FakeGenerator::new();

    let result = summarize_conversation(&generator, &config(6000), &bucket)
        .await
        .unwrap();

    assert_eq!(generator.calls(), 1);
    assert_eq!(result.conversation_name, "Work");
    assert_eq!(result.message_count, 2);
    assert_eq!(result.summary_text, "summary #1");

    let prompt = &generator.prompts()[0];
    assert!(prompt.contains("Chat: Work"));
    assert!(prompt.contains("- Ann: deploy at 5"));
    assert!(prompt.contains("\n- channel notice"));
    assert!(prompt.contains("in English"));
}

#[tokio::test]
async fn test_short_conversation_within_default_budget_is_one_call() {
    let messages = (0..10).map(|_| sized_record(30)).collect();
    let bucket = ConversationBucket::new("Chatty", messages);
    let generator = FakeGenerator::new();

    summarize_conversation(&generator, &DigestConfig::default(), &bucket)
        .await
        .unwrap();

    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_multiple_batches_are_combined_with_one_extra_call() {
    let bucket = ConversationBucket::new(
        "Family",
        vec![sized_record(600), sized_record(600), sized_record(500)],
    );
    let generator = FakeGenerator::new();

    let result = summarize_conversation(&generator, &config(700), &bucket)
        .await
        .unwrap();

    assert_eq!(generator.calls(), 4);
    assert_eq!(result.message_count, 3);
    assert_eq!(result.summary_text, "summary #4");

    let prompts = generator.prompts();
    let combine = &prompts[3];
    assert!(combine.starts_with("Combine these summaries"));
    assert!(combine.contains("in English"));
    let first = combine.find("summary #1").unwrap();
    let second = combine.find("summary #2").unwrap();
    let third = combine.find("summary #3").unwrap();
    assert!(first < second && second < third);
    assert!(combine.contains("summary #1\n\nsummary #2\n\nsummary #3"));
}

#[tokio::test]
async fn test_each_batch_prompt_holds_only_its_messages() {
    let bucket = ConversationBucket::new(
        "Split",
        vec![record("Ann", &"a".repeat(50)), record("Bob", &"b".repeat(50))],
    );
    let generator = FakeGenerator::new();

    summarize_conversation(&generator, &config(60), &bucket)
        .await
        .unwrap();

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].contains("- Ann: ") && !prompts[0].contains("- Bob: "));
    assert!(prompts[1].contains("- Bob: ") && !prompts[1].contains("- Ann: "));
}

#[tokio::test]
async fn test_failing_batch_abandons_the_conversation() {
    let bucket = ConversationBucket::new(
        "Flaky",
        vec![record("Ann", &"a".repeat(600)), record("Bob", &"b".repeat(600))],
    );
    let generator = FakeGenerator::failing_on("- Ann: ");

    let result = summarize_conversation(&generator, &config(700), &bucket).await;

    assert!(matches!(result, Err(DigestError::BackendUnavailable(_))));
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_empty_bucket_is_rejected_without_calls() {
    let bucket = ConversationBucket::new("Nothing", Vec::new());
    let generator = FakeGenerator::new();

    let result = summarize_conversation(&generator, &config(700), &bucket).await;

    assert!(result.is_err());
    assert_eq!(generator.calls(), 0);
}
