use super::*;

fn local_doc(content: &str) -> Passage {
    Passage::new(content, "https://pandas.pydata.org/docs/user_guide/indexing.html")
}

fn web_doc(content: &str, url: &str) -> Passage {
    Passage::new(content, url)
}

#[test]
fn local_template_interpolates_documents_in_order() {
    let context = PromptContext::Local(vec![local_doc("first passage"), local_doc("second passage")]);
    let message = compose("How do I filter rows?", &context);

    assert_eq!(message.role, Role::User);
    assert!(message.content.contains("How do I filter rows?"));

    let first = message
        .content
        .find("first passage")
        .expect("first document should be present");
    let second = message
        .content
        .find("second passage")
        .expect("second document should be present");
    assert!(first < second);
}

#[test]
fn local_template_with_no_documents_still_references_sentinel() {
    let context = PromptContext::Local(vec![]);
    let message = compose("How do I filter rows with pandas loc?", &context);

    assert!(message.content.contains(NO_ANSWER_SENTINEL));
    assert!(message.content.contains("Documents:\n\nInstructions:"));
}

#[test]
fn web_template_includes_source_urls() {
    let context = PromptContext::Web(vec![
        web_doc("a web snippet", "https://example.com/a"),
        web_doc("another snippet", "https://example.com/b"),
    ]);
    let message = compose("How do I cluster data?", &context);

    assert!(message.content.contains("URL: https://example.com/a"));
    assert!(message.content.contains("URL: https://example.com/b"));
    assert!(message.content.contains("a web snippet"));
    assert!(message.content.contains(NO_ANSWER_SENTINEL));
}

#[test]
fn templates_differ_by_context_variant() {
    let local = compose("question", &PromptContext::Local(vec![local_doc("text")]));
    let web = compose("question", &PromptContext::Web(vec![web_doc("text", "https://e.com")]));

    assert_ne!(local.content, web.content);
    assert!(local.content.contains("internal documentation"));
    assert!(web.content.contains("web-retrieved documents"));
}

#[test]
fn composition_is_idempotent() {
    let context = PromptContext::Local(vec![local_doc("stable content")]);
    let first = compose("same question", &context);
    let second = compose("same question", &context);

    assert_eq!(first, second);
    assert_eq!(first.content, second.content);
}

#[test]
fn web_template_with_no_documents_is_total() {
    let message = compose("question", &PromptContext::Web(vec![]));
    assert!(message.content.contains(NO_ANSWER_SENTINEL));
    assert!(message.content.ends_with("Web context:\n"));
}
