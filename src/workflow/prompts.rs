//! Agent prompt templates

use serde_json::Value;

use super::ContentStrategy;

pub const MARKET_ANALYSIS: &str = r#"Analyze current market trends for AI in the enterprise, focusing on automation, digital transformation and measurable ROI.

Identify:
- key trends
- the target audience (CTOs and technical decision-makers)
- competitor insights
- 3 to 5 timely blog post topics

Respond ONLY with a JSON object using exactly these keys: "trends", "targetAudience", "competitorInsights", "recommendedTopics"."#;

pub fn content_strategy(market: &Value) -> String {
    let market_json =
        serde_json::to_string_pretty(market).unwrap_or_else(|_| market.to_string());

    format!(
        r#"Based on the following market analysis, build a content strategy for a single blog post.

```json
{market_json}
```

Define a specific topic, a compelling angle, target keywords, the content type (for example "technical deep-dive") and a strong call to action.

Respond ONLY with a JSON object using exactly these keys: "topic", "angle", "targetKeywords", "contentType", "cta"."#
    )
}

pub fn writer(strategy: &ContentStrategy) -> String {
    format!(
        r##"Write a comprehensive, enterprise-focused blog post in Markdown about {topic}.

Target audience: CTOs and enterprise decision-makers
Content type: {content_type}
Keywords: {keywords}
Angle: {angle}
Tone: professional, authoritative, data-driven

Structure:
1. A single top-level "# " headline
2. Executive summary
3. Problem statement
4. Solution overview
5. Implementation roadmap
6. ROI analysis
7. Case study or worked example
8. Call to action: {cta}

Return only the Markdown post."##,
        topic = strategy.topic,
        content_type = strategy.content_type,
        keywords = strategy.target_keywords.join(", "),
        angle = strategy.angle,
        cta = strategy.cta,
    )
}
