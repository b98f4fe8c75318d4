use serde_json::json;

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

pub fn exit_error(message: &str) -> ! {
    let err = json!({ "error": "cli_error", "message": message });
    eprintln!("{}", serde_json::to_string_pretty(&err).unwrap());
    std::process::exit(1);
}

/// Execute an API request, print the response body, and return a shell
/// exit code: 0=success (2xx), 1=client error (4xx), 2=server error (5xx),
/// 3=connection error.
pub async fn api_request(
    api_url: &str,
    method: reqwest::Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> i32 {
    let url = format!("{api_url}{path}");
    let mut request = client().request(method, &url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(error) => {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "error": "connection_error",
                    "message": error.to_string(),
                    "docs_hint": "Is aegis-api running? Check --api-url / AEGIS_API_URL.",
                }))
                .unwrap()
            );
            return 3;
        }
    };

    let status = response.status().as_u16();
    let exit_code = match status {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    };

    let body: serde_json::Value = response
        .json()
        .await
        .unwrap_or_else(|error| json!({ "raw_error": error.to_string() }));

    let formatted = serde_json::to_string_pretty(&body).unwrap();
    if exit_code == 0 {
        println!("{formatted}");
    } else {
        eprintln!("{formatted}");
    }
    exit_code
}

/// Read JSON from a file path, or from stdin when `path` is `"-"`.
pub fn read_json_from_file(path: &str) -> Result<serde_json::Value, String> {
    use std::io::Read;

    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|error| format!("failed to read stdin: {error}"))?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|error| format!("failed to read file '{path}': {error}"))?
    };
    serde_json::from_str(&raw).map_err(|error| format!("invalid JSON in '{path}': {error}"))
}
