use url::Url;

/// Problem slug from a problem URL: the path segment after `problems`.
///
/// Query strings and fragments are ignored. URLs without a scheme
/// (`leetcode.com/problems/two-sum`) are accepted too.
pub fn slug_from_url(problem_url: &str) -> Option<String> {
    let trimmed = problem_url.trim();
    match Url::parse(trimmed) {
        Ok(parsed) => {
            let segments: Vec<&str> = parsed.path_segments()?.collect();
            slug_after_problems(&segments)
        }
        Err(_) => {
            let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
            let segments: Vec<&str> = path.split('/').collect();
            slug_after_problems(&segments)
        }
    }
}

fn slug_after_problems(segments: &[&str]) -> Option<String> {
    segments
        .windows(2)
        .find(|pair| pair[0] == "problems" && !pair[1].is_empty())
        .map(|pair| pair[1].to_string())
}
