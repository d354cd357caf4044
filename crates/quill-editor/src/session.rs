//! The editor session: draft mutation plus the save/generate cycles.

use quill_gateways::{
    Attachment, GatewayError, GeneratedArticle, GenerateGateway, SaveGateway, SaveReceipt,
    SaveRequest,
};
use quill_mdx::{render, Category, Status};

use crate::draft::Draft;

/// Save cycle: `Idle -> Saving -> (Saved | Failed)`, returning to `Idle`
/// on the next edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    Saved,
    Failed,
}

/// Generate cycle, orthogonal to the save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerateState {
    #[default]
    Idle,
    Generating,
    Generated,
    Failed,
}

/// Errors surfaced to the editor UI.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Save requested without a file name; no gateway call is made.
    #[error("Please enter a file name")]
    EmptyFileName,

    /// Generation requested without a prompt; no gateway call is made.
    #[error("Please enter an article idea")]
    EmptyPrompt,

    /// A save is already in flight; the new request is rejected as a
    /// no-op rather than queued.
    #[error("A save is already in progress")]
    SaveInFlight,

    /// A generation is already in flight; rejected as a no-op.
    #[error("A generation is already in progress")]
    GenerateInFlight,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// One editing session over a single draft.
///
/// The session is the only writer of its draft, so no locking discipline
/// applies inside it. Editing stays enabled in every state: the user may
/// keep typing while a save or generation request is in flight, but only
/// one request per operation kind may be outstanding at a time.
///
/// Gateways are injected at construction; the transition logic itself is
/// exposed as synchronous `begin_*`/`finish_*` pairs so it can be
/// exercised without a network, with [`EditorSession::save`] and
/// [`EditorSession::generate`] orchestrating the full round trips.
pub struct EditorSession<S, G> {
    draft: Draft,
    save_state: SaveState,
    generate_state: GenerateState,
    save_gateway: S,
    generate_gateway: G,
}

impl<S: SaveGateway, G: GenerateGateway> EditorSession<S, G> {
    /// Start a session with an empty draft.
    pub fn new(save_gateway: S, generate_gateway: G) -> Self {
        Self {
            draft: Draft::new(),
            save_state: SaveState::Idle,
            generate_state: GenerateState::Idle,
            save_gateway,
            generate_gateway,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn save_state(&self) -> SaveState {
        self.save_state
    }

    pub fn generate_state(&self) -> GenerateState {
        self.generate_state
    }

    /// Render the current body for the preview pane.
    pub fn preview(&self) -> String {
        render(&self.draft.body)
    }

    // Field edits: atomic last-write-wins, and any edit returns a
    // completed save/generate cycle to the editing baseline.

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.frontmatter.title = title.into();
        self.mark_editing();
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.draft.frontmatter.date = date.into();
        self.mark_editing();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.frontmatter.description = description.into();
        self.mark_editing();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.draft.frontmatter.author = author.into();
        self.mark_editing();
    }

    pub fn set_status(&mut self, status: Status) {
        self.draft.frontmatter.status = status;
        self.mark_editing();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.draft.body = body.into();
        self.mark_editing();
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.draft.file_name = file_name.into();
        self.mark_editing();
    }

    /// Append a category; no-op if already present.
    pub fn add_category(&mut self, category: Category) {
        if self.draft.frontmatter.add_category(category) {
            self.mark_editing();
        }
    }

    /// Remove a category; no-op if absent.
    pub fn remove_category(&mut self, category: Category) {
        if self.draft.frontmatter.remove_category(category) {
            self.mark_editing();
        }
    }

    /// Select an image to be committed with the next save.
    pub fn attach_image(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.draft.pending_image = Some(Attachment {
            name: name.into(),
            bytes,
        });
        self.mark_editing();
    }

    fn mark_editing(&mut self) {
        if matches!(self.save_state, SaveState::Saved | SaveState::Failed) {
            self.save_state = SaveState::Idle;
        }
        if matches!(
            self.generate_state,
            GenerateState::Generated | GenerateState::Failed
        ) {
            self.generate_state = GenerateState::Idle;
        }
    }

    /// Validate and snapshot the draft for saving, entering `Saving`.
    ///
    /// An empty file name fails synchronously: the save state becomes
    /// `Failed` and no request value is produced, so no gateway call can
    /// be made. A save already in flight is rejected without touching any
    /// state.
    pub fn begin_save(&mut self) -> Result<SaveRequest, EditorError> {
        if self.save_state == SaveState::Saving {
            return Err(EditorError::SaveInFlight);
        }
        if self.draft.file_name.trim().is_empty() {
            self.save_state = SaveState::Failed;
            return Err(EditorError::EmptyFileName);
        }

        self.save_state = SaveState::Saving;
        Ok(SaveRequest {
            file_name: self.draft.file_name.clone(),
            document: self.draft.to_mdx(),
            image: self.draft.pending_image.clone(),
        })
    }

    /// Record the gateway outcome for the in-flight save.
    ///
    /// The draft is never cleared; repeated save/edit cycles are the
    /// normal workflow. A failed save is not retried, and a partially
    /// committed image is not rolled back.
    pub fn finish_save(
        &mut self,
        outcome: Result<SaveReceipt, GatewayError>,
    ) -> Result<SaveReceipt, EditorError> {
        match outcome {
            Ok(receipt) => {
                self.save_state = SaveState::Saved;
                Ok(receipt)
            }
            Err(err) => {
                self.save_state = SaveState::Failed;
                Err(err.into())
            }
        }
    }

    /// Serialize the draft and commit it through the save gateway.
    pub async fn save(&mut self) -> Result<SaveReceipt, EditorError> {
        let request = self.begin_save()?;
        let outcome = self.save_gateway.save_post(&request).await;
        self.finish_save(outcome)
    }

    /// Validate the prompt, entering `Generating`.
    pub fn begin_generate(&mut self, prompt: &str) -> Result<String, EditorError> {
        if self.generate_state == GenerateState::Generating {
            return Err(EditorError::GenerateInFlight);
        }
        if prompt.trim().is_empty() {
            self.generate_state = GenerateState::Failed;
            return Err(EditorError::EmptyPrompt);
        }

        self.generate_state = GenerateState::Generating;
        Ok(prompt.to_string())
    }

    /// Record the gateway outcome for the in-flight generation and apply
    /// the parsed article to the draft.
    ///
    /// Applying is a destructive overwrite: title, description, and the
    /// whole body are replaced, discarding any unsaved body text. Parsing
    /// itself never fails; short or label-free output degrades to empty
    /// fields.
    pub fn finish_generate(
        &mut self,
        outcome: Result<String, GatewayError>,
    ) -> Result<GeneratedArticle, EditorError> {
        match outcome {
            Ok(text) => {
                let article = GeneratedArticle::from_completion(&text);
                self.draft.frontmatter.title = article.title.clone();
                self.draft.frontmatter.description = article.description.clone();
                self.draft.body = article.content.clone();
                self.generate_state = GenerateState::Generated;
                Ok(article)
            }
            Err(err) => {
                self.generate_state = GenerateState::Failed;
                Err(err.into())
            }
        }
    }

    /// Generate draft text for a topic and apply it to the draft.
    pub async fn generate(&mut self, prompt: &str) -> Result<GeneratedArticle, EditorError> {
        let prompt = self.begin_generate(prompt)?;
        let outcome = self.generate_gateway.generate(&prompt).await;
        self.finish_generate(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use quill_mdx::PostDocument;

    use super::*;

    #[derive(Default)]
    struct FakeStore {
        requests: Mutex<Vec<SaveRequest>>,
        fail: bool,
    }

    impl SaveGateway for FakeStore {
        async fn save_post(&self, request: &SaveRequest) -> Result<SaveReceipt, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(GatewayError::Upstream {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(SaveReceipt {
                sha: Some("abc123".to_string()),
                ..SaveReceipt::default()
            })
        }

        async fn commit_markdown(
            &self,
            _path: &str,
            _content: &str,
            _message: &str,
        ) -> Result<SaveReceipt, GatewayError> {
            Ok(SaveReceipt::default())
        }
    }

    #[derive(Default)]
    struct FakeCompletion {
        text: String,
        fail: bool,
    }

    impl GenerateGateway for FakeCompletion {
        async fn generate(&self, _prompt: &str) -> Result<String, GatewayError> {
            if self.fail {
                return Err(GatewayError::Upstream {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(self.text.clone())
        }
    }

    fn session() -> EditorSession<FakeStore, FakeCompletion> {
        EditorSession::new(FakeStore::default(), FakeCompletion::default())
    }

    #[test]
    fn starts_idle_with_an_empty_draft() {
        let session = session();

        assert_eq!(session.save_state(), SaveState::Idle);
        assert_eq!(session.generate_state(), GenerateState::Idle);
        assert_eq!(session.draft().body, "");
        assert_eq!(session.draft().file_name, "");
        assert_eq!(session.draft().frontmatter.status, Status::Draft);
    }

    #[test]
    fn save_with_empty_file_name_never_reaches_the_gateway() {
        let mut session = session();
        session.set_body("some text");

        let result = session.begin_save();

        assert!(matches!(result, Err(EditorError::EmptyFileName)));
        // Validation fails synchronously into an observable failed state.
        assert_eq!(session.save_state(), SaveState::Failed);
        assert_eq!(session.save_gateway.requests.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn save_round_trip_serializes_the_draft() {
        let mut session = session();
        session.set_file_name("hello");
        session.set_title("Hello");
        session.set_body("# Body");

        let receipt = session.save().await.unwrap();

        assert_eq!(receipt.sha.as_deref(), Some("abc123"));
        assert_eq!(session.save_state(), SaveState::Saved);

        let requests = session.save_gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].file_name, "hello");

        // The document on the wire parses back to the draft's content.
        let doc = PostDocument::from_mdx(&requests[0].document).unwrap();
        assert_eq!(doc.frontmatter.title, "Hello");
        assert_eq!(doc.body, "# Body");
    }

    #[tokio::test]
    async fn saving_does_not_clear_the_draft() {
        let mut session = session();
        session.set_file_name("hello");
        session.set_body("kept");

        session.save().await.unwrap();

        assert_eq!(session.draft().body, "kept");
        assert_eq!(session.draft().file_name, "hello");
    }

    #[tokio::test]
    async fn failed_save_is_observable_and_not_retried() {
        let mut session =
            EditorSession::new(FakeStore { fail: true, ..FakeStore::default() }, FakeCompletion::default());
        session.set_file_name("hello");

        let result = session.save().await;

        assert!(matches!(result, Err(EditorError::Gateway(_))));
        assert_eq!(session.save_state(), SaveState::Failed);
        assert_eq!(session.save_gateway.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn second_save_while_in_flight_is_rejected() {
        let mut session = session();
        session.set_file_name("hello");

        session.begin_save().unwrap();
        let second = session.begin_save();

        assert!(matches!(second, Err(EditorError::SaveInFlight)));
        assert_eq!(session.save_state(), SaveState::Saving);
    }

    #[test]
    fn editing_remains_enabled_while_saving() {
        let mut session = session();
        session.set_file_name("hello");
        session.begin_save().unwrap();

        session.set_body("typed during save");

        assert_eq!(session.draft().body, "typed during save");
        assert_eq!(session.save_state(), SaveState::Saving);
    }

    #[test]
    fn an_edit_returns_a_completed_cycle_to_idle() {
        let mut session = session();
        session.set_file_name("hello");
        session.begin_save().unwrap();
        session.finish_save(Ok(SaveReceipt::default())).unwrap();
        assert_eq!(session.save_state(), SaveState::Saved);

        session.set_body("more");

        assert_eq!(session.save_state(), SaveState::Idle);
    }

    #[test]
    fn generate_with_empty_prompt_fails_synchronously() {
        let mut session = session();

        let result = session.begin_generate("   ");

        assert!(matches!(result, Err(EditorError::EmptyPrompt)));
        assert_eq!(session.generate_state(), GenerateState::Failed);
    }

    #[tokio::test]
    async fn generation_overwrites_title_description_and_body() {
        let mut session = EditorSession::new(
            FakeStore::default(),
            FakeCompletion {
                text: "Title: Foo\nDescription: Bar\nSome body line".to_string(),
                fail: false,
            },
        );
        session.set_body("unsaved text that will be lost");

        let article = session.generate("an idea").await.unwrap();

        assert_eq!(article.title, "Foo");
        assert_eq!(session.draft().frontmatter.title, "Foo");
        assert_eq!(session.draft().frontmatter.description, "Bar");
        // Destructive overwrite, not a merge.
        assert_eq!(session.draft().body, "Some body line");
        assert_eq!(session.generate_state(), GenerateState::Generated);
    }

    #[tokio::test]
    async fn short_generation_output_degrades_without_error() {
        let mut session = EditorSession::new(
            FakeStore::default(),
            FakeCompletion {
                text: "Title: Only\n".to_string(),
                fail: false,
            },
        );

        let article = session.generate("an idea").await.unwrap();

        assert_eq!(article.title, "Only");
        assert_eq!(article.description, "");
        assert_eq!(article.content, "");
    }

    #[tokio::test]
    async fn failed_generation_keeps_the_existing_body() {
        let mut session = EditorSession::new(
            FakeStore::default(),
            FakeCompletion { text: String::new(), fail: true },
        );
        session.set_body("still here");

        let result = session.generate("an idea").await;

        assert!(matches!(result, Err(EditorError::Gateway(_))));
        assert_eq!(session.generate_state(), GenerateState::Failed);
        assert_eq!(session.draft().body, "still here");
    }

    #[test]
    fn second_generate_while_in_flight_is_rejected() {
        let mut session = session();

        session.begin_generate("idea").unwrap();
        let second = session.begin_generate("another");

        assert!(matches!(second, Err(EditorError::GenerateInFlight)));
    }

    #[test]
    fn save_and_generate_cycles_are_orthogonal() {
        let mut session = session();
        session.set_file_name("hello");

        session.begin_save().unwrap();
        session.begin_generate("idea").unwrap();

        assert_eq!(session.save_state(), SaveState::Saving);
        assert_eq!(session.generate_state(), GenerateState::Generating);
    }

    #[test]
    fn preview_renders_the_current_body() {
        let mut session = session();
        session.set_body("**bold** and *italic*");

        assert_eq!(
            session.preview(),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn attach_image_is_carried_into_the_save_request() {
        let mut session = session();
        session.set_file_name("hello");
        session.attach_image("cover.png", vec![1, 2, 3]);

        let request = session.begin_save().unwrap();

        let image = request.image.unwrap();
        assert_eq!(image.name, "cover.png");
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }
}
