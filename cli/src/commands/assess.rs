use crate::util::{api_request, exit_error, read_json_from_file};

pub async fn run(api_url: &str, body_path: &str, asynchronous: bool) -> i32 {
    let body = match read_json_from_file(body_path) {
        Ok(body) => body,
        Err(message) => exit_error(&message),
    };

    let path = if asynchronous { "/assess/async" } else { "/assess" };
    api_request(api_url, reqwest::Method::POST, path, Some(body)).await
}

pub async fn task(api_url: &str, task_id: &str) -> i32 {
    api_request(
        api_url,
        reqwest::Method::GET,
        &format!("/tasks/{task_id}"),
        None,
    )
    .await
}
