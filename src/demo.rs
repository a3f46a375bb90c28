//! Demo run against a JSONPlaceholder-style users/posts service.
//!
//! Each step feeds values extracted from earlier responses into later
//! requests, the way an ad-hoc API test script would.

use serde_json::{Value, json};
use std::io::Write;

use crate::client::{ApiClient, RequestOptions, Transport};
use crate::recorder::Recorder;
use crate::render::display_value;
use crate::summary::RunSummary;

/// The demo sequence: read, create, update, delete, then confirm the delete.
pub fn run<T: Transport, W: Write>(
    api: &ApiClient<T>,
    recorder: &mut Recorder<W>,
    base: &str,
    token: Option<&str>,
) -> Option<RunSummary> {
    let opts = || match token {
        Some(token) => RequestOptions::new().bearer(token),
        None => RequestOptions::new(),
    };

    let [uid, uname, city] = recorder
        .evaluate(
            "1. fetch user 1",
            &api.get(&format!("{base}/users/1"), opts()),
            &["id", "name", "address.city"],
        )
        .into_array();
    let uid_segment = cell(uid.as_ref());

    recorder.evaluate(
        "2. list posts of the user",
        &api.get(&format!("{base}/users/{uid_segment}/posts"), opts()),
        &[],
    );

    let [post_body, post_title] = recorder
        .evaluate(
            "3. first post of the user",
            &api.get(&format!("{base}/users/{uid_segment}/posts"), opts()),
            &["0.body", "0.title"],
        )
        .into_array();

    let new_post = recorder
        .evaluate(
            "4. create a post",
            &api.post(
                &format!("{base}/posts"),
                opts().body(json!({"title": "A post", "body": "created by api-probe", "userId": uid})),
            ),
            &["id"],
        )
        .value();
    let post_segment = cell(new_post.as_ref());
    tracing::debug!(user = %uid_segment, post = %post_segment, "extracted ids");

    let update = json!({"id": new_post, "title": "updated", "body": "new content", "userId": uid});
    recorder.evaluate(
        "5. replace the post",
        &api.put(&format!("{base}/posts/1"), opts().body(update.clone())),
        &[],
    );
    recorder.evaluate(
        "6. patch the post",
        &api.patch(&format!("{base}/posts/1"), opts().body(update)),
        &[],
    );

    recorder.evaluate(
        "7. fetch a post with a custom header",
        &api.get(
            &format!("{base}/posts/1"),
            opts().header("X-Source", "api-probe-demo"),
        ),
        &[],
    );

    recorder.evaluate(
        "8. allowed methods on a post",
        &api.options(&format!("{base}/posts/1"), opts()),
        &[],
    );

    recorder.evaluate(
        "9. delete the post",
        &api.delete(&format!("{base}/posts/{post_segment}"), opts()),
        &[],
    );

    recorder.evaluate(
        "10. deleted post is gone (expect 404)",
        &api.get(&format!("{base}/posts/{post_segment}"), opts().should_fail(true)),
        &[],
    );

    let [lat, lng] = recorder
        .evaluate(
            "11. user coordinates",
            &api.get(&format!("{base}/users/1"), opts()),
            &["address.geo.lat", "address.geo.lng"],
        )
        .into_array();

    recorder.print_info(
        "Collected values",
        [
            ("user id", cell(uid.as_ref())),
            ("user name", cell(uname.as_ref())),
            ("city", cell(city.as_ref())),
            ("post id", cell(new_post.as_ref())),
            ("post title", cell(post_title.as_ref())),
            ("post body", cell(post_body.as_ref())),
            ("latitude", cell(lat.as_ref())),
            ("longitude", cell(lng.as_ref())),
        ],
    );

    recorder.summarize("Demo results")
}

/// Extracted value as table or URL text
pub fn cell(value: Option<&Value>) -> String {
    value.map_or("null".to_string(), display_value)
}
