use parla_core::FeedbackTier;

/// Encouragement shown to the learner for each tier.
pub const fn feedback_message(tier: FeedbackTier) -> &'static str {
    match tier {
        FeedbackTier::Perfect => "Perfect! You heard every word.",
        FeedbackTier::VeryGood => "Very good! Only a small slip.",
        FeedbackTier::Good => "Good job. A few words need another listen.",
        FeedbackTier::NeedsImprovement => "Keep practicing. Listen again and focus on each word.",
        FeedbackTier::Retry => "Try again. Play the sentence slowly and write what you hear.",
    }
}
