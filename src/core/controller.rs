use uuid::Uuid;

use crate::{
    api::CompareBackend,
    core::{
        form::{FormState, Phase},
        notify::{Notification, Notifier},
    },
    error::{AppError, Result},
    models::{
        comparison::{ComparisonRequest, ComparisonResult, SimilarityFunction},
        embedding::EmbedResponse,
    },
};

/// A submission that passed the guards and is waiting for its outcome.
///
/// Only `ComparatorController::begin_submit` creates one, and the controller
/// refuses to create a second while it is outstanding. Hand it back through
/// `finish_submit` or `cancel_submit`.
#[derive(Debug)]
#[must_use = "a pending submission keeps the form in Submitting until finished or cancelled"]
pub struct PendingSubmission {
    id: Uuid,
    request: ComparisonRequest,
}

impl PendingSubmission {
    /// Identifier used to correlate log lines for this submission
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The request to send
    pub fn request(&self) -> &ComparisonRequest {
        &self.request
    }
}

/// Puts the form back to `Idle` if a submission is dropped before it settles
struct SubmittingGuard<'a> {
    state: &'a mut FormState,
    outstanding: &'a mut Option<Uuid>,
    armed: bool,
}

impl SubmittingGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Some(id) = self.outstanding.take() {
                log::warn!("submission {} dropped before it settled", id);
            }
            self.state.phase = Phase::Idle;
        }
    }
}

/// Owns the comparator form and runs its submission workflow.
///
/// Operations take `&mut self`: the controller is the only writer of its
/// `FormState`.
#[derive(Debug)]
pub struct ComparatorController<B, N> {
    backend: B,
    notifier: N,
    state: FormState,
    outstanding: Option<Uuid>,
}

impl<B, N> ComparatorController<B, N>
where
    B: CompareBackend,
    N: Notifier,
{
    /// Create a controller with a fresh form
    pub fn new(backend: B, notifier: N) -> Self {
        Self {
            backend,
            notifier,
            state: FormState::new(),
            outstanding: None,
        }
    }

    /// Current form state
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// The backend requests are sent to
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current target text
    pub fn target_text(&self) -> &str {
        &self.state.target_text
    }

    /// Every compare field, blank ones included
    pub fn compare_texts(&self) -> &[String] {
        self.state.compare_texts.as_slice()
    }

    /// Selected scoring method
    pub fn function(&self) -> SimilarityFunction {
        self.state.function
    }

    /// Results of the last successful submission
    pub fn results(&self) -> &[ComparisonResult] {
        &self.state.results
    }

    /// True while a request is in flight
    pub fn is_submitting(&self) -> bool {
        self.state.is_submitting()
    }

    /// Replace the target text
    pub fn update_target(&mut self, text: impl Into<String>) {
        self.state.target_text = text.into();
    }

    /// Replace the compare field at `index`
    pub fn update_compare_at(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.state.compare_texts.set(index, text)
    }

    /// Append an empty compare field
    pub fn add_compare_field(&mut self) {
        self.state.compare_texts.push_empty();
    }

    /// Remove a compare field; the last one is never removed
    pub fn remove_compare_field(&mut self, index: usize) -> Result<String> {
        self.state.compare_texts.remove(index)
    }

    /// Select the scoring method
    pub fn set_function(&mut self, function: SimilarityFunction) {
        self.state.function = function;
    }

    /// Set the function from its name, rejecting anything unknown
    pub fn set_function_named(&mut self, name: &str) -> Result<()> {
        let function = name.parse()?;
        self.set_function(function);
        Ok(())
    }

    /// Whether the submit action should be offered right now
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.state.validate().is_ok()
    }

    /// Check the guards, enter `Submitting` and build the request.
    ///
    /// Nothing changes when an error is returned.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission> {
        if self.state.phase == Phase::Submitting {
            log::warn!("submit ignored: a comparison is already in flight");
            return Err(AppError::SubmissionInProgress);
        }
        self.state.validate()?;

        let request = ComparisonRequest {
            target_text: self.state.target_text.clone(),
            compares: self.state.compare_texts.non_blank(),
            function: self.state.function,
        };
        let pending = PendingSubmission {
            id: Uuid::new_v4(),
            request,
        };

        self.state.phase = Phase::Submitting;
        self.outstanding = Some(pending.id);
        log::debug!(
            "submission {} started: {} compare text(s), function {}",
            pending.id,
            pending.request.compares.len(),
            pending.request.function
        );
        Ok(pending)
    }

    fn check_outstanding(&self, pending: &PendingSubmission) -> Result<()> {
        if self.outstanding == Some(pending.id) {
            Ok(())
        } else {
            log::warn!("submission {} does not belong to this form", pending.id);
            Err(AppError::UnknownSubmission(pending.id))
        }
    }

    /// Apply the outcome of `pending` and return to `Idle`.
    ///
    /// On failure the previous results are kept and exactly one failure
    /// notification is delivered. A submission this controller did not start
    /// is rejected and changes nothing.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<Vec<ComparisonResult>>,
    ) -> Result<&[ComparisonResult]> {
        self.check_outstanding(&pending)?;

        let result = match outcome {
            Ok(results) => {
                log::info!("submission {} returned {} result(s)", pending.id, results.len());
                self.state.results = results;
                Ok(())
            }
            Err(err) => {
                log::debug!("submission {} failed: {}", pending.id, err);
                self.notifier.notify(Notification::failure(&err));
                Err(err)
            }
        };

        self.outstanding = None;
        self.state.phase = Phase::Idle;
        result.map(|()| self.state.results.as_slice())
    }

    /// Abandon `pending` without an outcome; results are left as they were
    pub fn cancel_submit(&mut self, pending: PendingSubmission) -> Result<()> {
        self.check_outstanding(&pending)?;
        log::info!("submission {} cancelled", pending.id);
        self.outstanding = None;
        self.state.phase = Phase::Idle;
        Ok(())
    }

    /// Run one full submission against the backend.
    ///
    /// Dropping the returned future before it completes puts the form back
    /// to `Idle` with the previous results.
    pub async fn submit(&mut self) -> Result<&[ComparisonResult]> {
        let pending = self.begin_submit()?;

        let guard = SubmittingGuard {
            state: &mut self.state,
            outstanding: &mut self.outstanding,
            armed: true,
        };
        let outcome = self.backend.compare(pending.request()).await;
        guard.disarm();

        self.finish_submit(pending, outcome)
    }
}

/// Fire the embedding call for `text` and report what came back
pub async fn trigger_embedding<B, N>(
    backend: &B,
    notifier: &mut N,
    text: &str,
) -> Result<EmbedResponse>
where
    B: CompareBackend,
    N: Notifier,
{
    match backend.embed_text(text).await {
        Ok(response) => {
            let summary = match response.dimensions() {
                Some(dims) => format!("Embedding result: {} dimension(s)", dims),
                None => format!("Embedding result: {}", response.embedding),
            };
            log::debug!("{}", summary);
            notifier.notify(Notification::info(summary));
            Ok(response)
        }
        Err(err) => {
            notifier.notify(Notification::failure(&err));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notify::{Level, MemoryNotifier};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every request and answers with a scripted outcome
    #[derive(Default)]
    struct ScriptedBackend {
        calls: Mutex<Vec<ComparisonRequest>>,
        fail_with: Option<String>,
        results: Vec<ComparisonResult>,
        delay: Option<Duration>,
    }

    impl ScriptedBackend {
        fn ok(results: Vec<ComparisonResult>) -> Self {
            Self {
                results,
                ..Self::default()
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::default()
            }
        }

        fn hanging() -> Self {
            Self {
                delay: Some(Duration::from_secs(3600)),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<ComparisonRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompareBackend for ScriptedBackend {
        async fn compare(&self, request: &ComparisonRequest) -> Result<Vec<ComparisonResult>> {
            self.calls.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.fail_with {
                Some(message) => Err(AppError::Transport(message.clone())),
                None => Ok(self.results.clone()),
            }
        }

        async fn embed_text(&self, _text: &str) -> Result<EmbedResponse> {
            match &self.fail_with {
                Some(message) => Err(AppError::Transport(message.clone())),
                None => Ok(EmbedResponse {
                    embedding: serde_json::json!([0.5, 0.25]),
                }),
            }
        }
    }

    type TestController = ComparatorController<ScriptedBackend, MemoryNotifier>;

    fn result(text: &str, score: f64) -> ComparisonResult {
        ComparisonResult {
            text: text.to_string(),
            score,
        }
    }

    fn filled(backend: ScriptedBackend) -> (TestController, MemoryNotifier) {
        let notifier = MemoryNotifier::new();
        let mut controller = ComparatorController::new(backend, notifier.clone());
        controller.update_target("hello");
        controller.update_compare_at(0, "world").unwrap();
        controller.add_compare_field();
        controller.update_compare_at(1, "  ").unwrap();
        controller.add_compare_field();
        controller.update_compare_at(2, "foo").unwrap();
        (controller, notifier)
    }

    #[tokio::test]
    async fn test_empty_target_never_sends() {
        let notifier = MemoryNotifier::new();
        let mut controller =
            ComparatorController::new(ScriptedBackend::default(), notifier.clone());
        controller.update_compare_at(0, "world").unwrap();

        assert!(!controller.can_submit());
        assert!(matches!(controller.submit().await, Err(AppError::Validation(_))));
        assert!(!controller.is_submitting());
        assert!(controller.backend().calls().is_empty());
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_blank_compares_never_send() {
        let mut controller =
            ComparatorController::new(ScriptedBackend::default(), MemoryNotifier::new());
        controller.update_target("hello");
        controller.update_compare_at(0, "   ").unwrap();
        controller.add_compare_field();

        assert!(matches!(controller.submit().await, Err(AppError::Validation(_))));
        assert!(controller.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_entries_dropped_in_order() {
        let (mut controller, _) = filled(ScriptedBackend::ok(vec![]));
        controller.submit().await.unwrap();

        let calls = controller.backend().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].target_text, "hello");
        assert_eq!(calls[0].compares, vec!["world".to_string(), "foo".to_string()]);
        assert_eq!(calls[0].function, SimilarityFunction::Cosine);
        // the form itself keeps the blank field
        assert_eq!(controller.compare_texts().len(), 3);
    }

    #[tokio::test]
    async fn test_success_replaces_results_verbatim() {
        let expected = vec![result("world", 0.9), result("foo", 0.3)];
        let (mut controller, notifier) = filled(ScriptedBackend::ok(expected.clone()));

        let returned = controller.submit().await.unwrap().to_vec();
        assert_eq!(returned, expected);
        assert_eq!(controller.results(), expected.as_slice());
        assert!(!controller.is_submitting());
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_results_and_notifies_once() {
        let (mut controller, notifier) = filled(ScriptedBackend::failing("connection refused"));
        let previous = vec![result("old", 0.5)];
        controller.state.results = previous.clone();

        let err = controller.submit().await.unwrap_err();
        assert!(err.is_submission_failure());
        assert_eq!(controller.results(), previous.as_slice());
        assert!(!controller.is_submitting());

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_dropped_submit_returns_to_idle() {
        let (mut controller, notifier) = filled(ScriptedBackend::hanging());
        let previous = vec![result("old", 0.5)];
        controller.state.results = previous.clone();

        let timed_out =
            tokio::time::timeout(Duration::from_millis(50), controller.submit()).await;
        assert!(timed_out.is_err());

        assert!(!controller.is_submitting());
        assert!(controller.can_submit());
        assert_eq!(controller.results(), previous.as_slice());
        assert!(notifier.is_empty());

        // the form accepts a new submission afterwards
        let pending = controller.begin_submit().unwrap();
        controller.cancel_submit(pending).unwrap();
        assert!(!controller.is_submitting());
    }

    #[test]
    fn test_second_submit_rejected_while_in_flight() {
        let (mut controller, _) = filled(ScriptedBackend::default());

        let pending = controller.begin_submit().unwrap();
        assert!(controller.is_submitting());
        assert!(!controller.can_submit());
        assert!(matches!(controller.begin_submit(), Err(AppError::SubmissionInProgress)));

        controller
            .finish_submit(pending, Ok(vec![result("world", 1.0)]))
            .unwrap();
        assert!(!controller.is_submitting());
        assert!(controller.can_submit());
    }

    #[test]
    fn test_cancel_keeps_results() {
        let (mut controller, notifier) = filled(ScriptedBackend::default());
        controller.state.results = vec![result("old", 0.5)];

        let pending = controller.begin_submit().unwrap();
        controller.cancel_submit(pending).unwrap();

        assert!(!controller.is_submitting());
        assert_eq!(controller.results(), &[result("old", 0.5)]);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_foreign_submission_rejected() {
        let (mut first, _) = filled(ScriptedBackend::default());
        let (mut second, second_notes) = filled(ScriptedBackend::default());

        let from_first = first.begin_submit().unwrap();
        let from_second = second.begin_submit().unwrap();

        let err = second
            .finish_submit(from_first, Ok(vec![result("wrong form", 1.0)]))
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownSubmission(_)));
        assert!(second.results().is_empty());
        assert!(second.is_submitting());
        assert!(second_notes.is_empty());

        second.finish_submit(from_second, Ok(vec![result("world", 0.9)])).unwrap();
        assert_eq!(second.results(), &[result("world", 0.9)]);
        assert!(!second.is_submitting());
        // the first form is still waiting on its own submission
        assert!(first.is_submitting());
    }

    #[test]
    fn test_set_function_idempotent() {
        let (mut controller, _) = filled(ScriptedBackend::default());
        let before = controller.state().clone();

        controller.set_function_named("cosine").unwrap();
        controller.set_function_named("cosine").unwrap();
        assert_eq!(controller.state(), &before);

        controller.set_function(SimilarityFunction::Euclidean);
        assert_eq!(controller.function(), SimilarityFunction::Euclidean);
    }

    #[test]
    fn test_unknown_function_rejected() {
        let (mut controller, _) = filled(ScriptedBackend::default());
        assert!(controller.set_function_named("jaccard").is_err());
        assert_eq!(controller.function(), SimilarityFunction::Cosine);
    }

    #[test]
    fn test_remove_last_field_refused() {
        let mut controller =
            ComparatorController::new(ScriptedBackend::default(), MemoryNotifier::new());
        controller.update_compare_at(0, "only").unwrap();

        assert!(matches!(controller.remove_compare_field(0), Err(AppError::LastCompareField)));
        assert_eq!(controller.compare_texts(), &["only".to_string()]);
    }

    #[test]
    fn test_out_of_bounds_edit_refused() {
        let mut controller =
            ComparatorController::new(ScriptedBackend::default(), MemoryNotifier::new());
        assert!(matches!(
            controller.update_compare_at(1, "x"),
            Err(AppError::IndexOutOfBounds { index: 1, len: 1 })
        ));
        assert_eq!(controller.compare_texts(), &[String::new()]);
    }

    #[tokio::test]
    async fn test_trigger_embedding_reports_dimensions() {
        let backend = ScriptedBackend::default();
        let mut notifier = MemoryNotifier::new();

        let response = trigger_embedding(&backend, &mut notifier, "texto").await.unwrap();
        assert_eq!(response.dimensions(), Some(2));

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Info);
        assert_eq!(notes[0].message, "Embedding result: 2 dimension(s)");
    }

    #[tokio::test]
    async fn test_trigger_embedding_failure_notifies() {
        let backend = ScriptedBackend::failing("no route to host");
        let mut notifier = MemoryNotifier::new();

        assert!(trigger_embedding(&backend, &mut notifier, "texto").await.is_err());
        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Error);
    }
}
