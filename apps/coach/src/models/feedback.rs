use serde::{Deserialize, Serialize};

pub const MAX_SCORE: f64 = 10.0;

/// Structured evaluation of one answer, produced once by the Interview Service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub score: f64, // 0 – 10
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(rename = "aiSuggestedAnswer", default)]
    pub suggested_answer: String,
}

impl Feedback {
    pub fn score_in_range(&self) -> bool {
        self.score.is_finite() && (0.0..=MAX_SCORE).contains(&self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_deserializes_wire_names() {
        let json = r#"{
            "score": 7,
            "strengths": "Clear structure",
            "weaknesses": "No metrics",
            "improvements": "Quantify the impact",
            "aiSuggestedAnswer": "I would use a bounded connection pool..."
        }"#;
        let feedback: Feedback = serde_json::from_str(json).unwrap();
        assert!((feedback.score - 7.0).abs() < f64::EPSILON);
        assert_eq!(feedback.strengths, "Clear structure");
        assert!(feedback.suggested_answer.starts_with("I would use"));
    }

    #[test]
    fn test_missing_text_fields_default_to_empty() {
        let feedback: Feedback = serde_json::from_str(r#"{"score": 4.5}"#).unwrap();
        assert!(feedback.weaknesses.is_empty());
        assert!(feedback.score_in_range());
    }

    #[test]
    fn test_score_bounds() {
        let mut feedback: Feedback = serde_json::from_str(r#"{"score": 10}"#).unwrap();
        assert!(feedback.score_in_range());
        feedback.score = 10.5;
        assert!(!feedback.score_in_range());
        feedback.score = -1.0;
        assert!(!feedback.score_in_range());
        feedback.score = f64::NAN;
        assert!(!feedback.score_in_range());
    }
}
