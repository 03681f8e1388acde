//
//  prompt.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant for generating Swagger annotation comments for Go handler functions.";

const EXAMPLE: &str = r#"Here is an example of a Go handler function:
// ListAccounts lists all existing accounts
//
//  @Summary      List accounts
//  @Description  get accounts
//  @Tags         accounts
//  @Accept       json
//  @Produce      json
//  @Param        q    query     string  false  "name search by q"  Format(email)
//  @Success      200  {array}   model.Account
//  @Failure      400  {object}  httputil.HTTPError
//  @Failure      404  {object}  httputil.HTTPError
//  @Failure      500  {object}  httputil.HTTPError
//  @Router       /accounts [get]"#;

const INSTRUCTIONS: &str = "Do not add any explanation and just return the Swagger comments. \
Do not wrap it in Markdown. Do not return the function itself.\n\
If it is not a handler function (e.g. a function in a test file or a helper function), return nothing.";

/// Build the user message for one handler.
pub fn build_user_prompt(source: &str, routes: Option<&str>) -> String {
    let mut prompt = format!(
        "{EXAMPLE}\nGenerate Swagger comments for the following function:\n{source}\n"
    );
    if let Some(routes) = routes.filter(|r| !r.is_empty()) {
        prompt.push_str(&format!(
            "Use the most relevant of these routes for the @Router annotation: {routes}\n"
        ));
    }
    prompt.push_str(INSTRUCTIONS);
    prompt
}

/// Rough token count for one handler's request.
///
/// Words (space-separated) times 1.5, a deliberately high guess over the
/// ~1.33 tokens per English word.
pub fn estimate_tokens(source: &str) -> usize {
    let prompt = format!("{}{}", build_user_prompt(source, None), SYSTEM_PROMPT);
    let words = prompt.split(' ').count();
    (words as f64 * 1.5) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_source_and_routes() {
        let prompt = build_user_prompt("func A(c *gin.Context) {}", Some("/a [get]"));
        assert!(prompt.contains("func A(c *gin.Context) {}"));
        assert!(prompt.contains("@Router annotation: /a [get]"));
        assert!(prompt.ends_with("return nothing."));
    }

    #[test]
    fn test_empty_routes_omit_router_hint() {
        let prompt = build_user_prompt("func A(c *gin.Context) {}", Some(""));
        assert!(!prompt.contains("@Router annotation"));
        assert_eq!(prompt, build_user_prompt("func A(c *gin.Context) {}", None));
    }

    #[test]
    fn test_estimate_grows_with_source() {
        let small = estimate_tokens("func A(c *gin.Context) {}");
        let large = estimate_tokens(&"word ".repeat(200));
        assert!(small > 0);
        assert!(large > small + 250);
    }
}
