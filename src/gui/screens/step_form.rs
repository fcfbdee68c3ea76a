use std::collections::HashMap;
use std::path::PathBuf;

use iced::widget::{button, checkbox, column, row, scrollable, text, text_input};
use iced::{Element, Length, Task};
use tracing::warn;

use crate::core::forms::{self, FieldError, FieldKind};
use crate::core::payment::ReturnParams;
use crate::core::sequencer::{Decision, FetchOutcome, decide};
use crate::core::wizard::{Step, WizardAction, WizardState, reduce};
use crate::gui::screens::{Screen, ScreenMessage};
use crate::gui::state::Notification;
use crate::gui::{AppState, message::Route, widgets};
use crate::models::ApplicationRecord;

/// Whether the step renders its fresh creation form or the update variant
/// over already-submitted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

#[derive(Debug, Clone)]
pub struct StepFormScreen {
    step: Step,
    mode: FormMode,
    values: HashMap<String, String>,
    attachments: Vec<PathBuf>,
    /// File names already on the record, shown on the update variant of the
    /// document and photo steps.
    uploaded: Vec<String>,
    errors: Vec<FieldError>,
    fetching: bool,
    submitting: bool,
}

#[derive(Debug, Clone)]
pub enum StepFormMessage {
    Fetched(FetchOutcome),
    FieldChanged(&'static str, String),
    FlagToggled(&'static str, bool),
    PickFile,
    FilePicked(Option<PathBuf>),
    Submit,
    Submitted(SubmitOutcome),
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The step was created; progress has already been written to disk.
    Advanced {
        record: ApplicationRecord,
        wizard: WizardState,
    },
    Updated(ApplicationRecord),
    Failed(String),
}

impl StepFormScreen {
    fn blank(step: Step, mode: FormMode) -> Self {
        Self {
            step,
            mode,
            values: HashMap::new(),
            attachments: Vec::new(),
            uploaded: Vec::new(),
            errors: Vec::new(),
            fetching: false,
            submitting: false,
        }
    }

    pub fn enter(
        step: Step,
        mode: FormMode,
        state: &mut AppState,
    ) -> (Self, Task<ScreenMessage<Self>>) {
        let Some(id) = state.wizard.form_id.clone() else {
            // Without a cached identifier nothing can be fetched; only the
            // first step may show a fresh form.
            return match decide(step, None, &state.wizard) {
                Decision::ShowCreate => (Self::blank(step, FormMode::Create), Task::none()),
                _ => (
                    Self::blank(step, mode),
                    Task::done(ScreenMessage::ParentMessage(Route::Step(
                        Step::first(),
                        FormMode::Create,
                    ))),
                ),
            };
        };
        let mut screen = Self::blank(step, mode);
        screen.fetching = true;
        let api = state.api.clone();
        let task = Task::perform(
            async move { FetchOutcome::from_result(api.fetch_application(&id).await) },
            |outcome| ScreenMessage::ScreenMessage(StepFormMessage::Fetched(outcome)),
        );
        (screen, task)
    }

    fn prefill(&mut self, record: &ApplicationRecord) {
        if let Some(document) = record.step_document(self.step) {
            self.values = forms::values_from_document(&document);
        }
        self.uploaded = match self.step {
            Step::Documents => record
                .documents
                .as_ref()
                .map(|d| d.files.iter().map(|f| f.name.clone()).collect())
                .unwrap_or_default(),
            Step::Photo => record
                .photo
                .as_ref()
                .map(|p| vec![p.file_name.clone()])
                .unwrap_or_default(),
            _ => Vec::new(),
        };
    }

    fn takes_files(&self) -> bool {
        matches!(self.step, Step::Documents | Step::Photo)
    }

    fn next_route(&self) -> Route {
        match self.step.next() {
            Some(next) => Route::Step(next, FormMode::Create),
            None => Route::Payment,
        }
    }

    fn submit(&mut self, state: &mut AppState) -> Task<ScreenMessage<Self>> {
        let fields = forms::step_fields(self.step);
        if let Err(errors) = forms::validate(fields, &self.values) {
            self.errors = errors;
            return Task::none();
        }
        self.errors.clear();

        if self.takes_files() && self.attachments.is_empty() {
            if self.mode == FormMode::Update {
                // Nothing new to upload; the record already holds the files.
                return Task::done(ScreenMessage::ParentMessage(self.next_route()));
            }
            state.notification = Some(Notification::failure("Pick at least one file first."));
            return Task::none();
        }

        self.submitting = true;
        let step = self.step;
        let mode = self.mode;
        let payload = forms::payload(fields, &self.values);
        let attachments = self.attachments.clone();
        let api = state.api.clone();
        let cache = state.cache.clone();
        let wizard = state.wizard.clone();

        let task = async move {
            let result = async {
                let record = match (mode, wizard.form_id.clone()) {
                    (FormMode::Create, None) => api.create_application(&payload).await?,
                    (FormMode::Create, Some(id)) if !attachments.is_empty() => {
                        let mut record = None;
                        for path in &attachments {
                            record = Some(api.upload_file(&id, step, path).await?);
                        }
                        record.unwrap_or_default()
                    }
                    (FormMode::Create, Some(id)) => api.submit_step(&id, step, &payload).await?,
                    (FormMode::Update, Some(id)) if !attachments.is_empty() => {
                        let mut record = None;
                        for path in &attachments {
                            record = Some(api.upload_file(&id, step, path).await?);
                        }
                        record.unwrap_or_default()
                    }
                    (FormMode::Update, Some(id)) => api.update_step(&id, step, &payload).await?,
                    (FormMode::Update, None) => {
                        return Ok(SubmitOutcome::Failed(
                            "no application in progress".to_string(),
                        ));
                    }
                };
                if mode == FormMode::Update {
                    return Ok(SubmitOutcome::Updated(record));
                }
                let mut next = reduce(&wizard, WizardAction::SetFormId(record.id.clone()));
                next.apply(WizardAction::SetStepCompleted(step));
                // The write is awaited here so the navigation message below
                // can never outrun the cache.
                if let Err(e) = cache.save(&next).await {
                    warn!(error = %e, "failed to persist progress");
                }
                Ok::<_, crate::api::ApiError>(SubmitOutcome::Advanced {
                    record,
                    wizard: next,
                })
            }
            .await;
            result.unwrap_or_else(|e| SubmitOutcome::Failed(e.to_string()))
        };
        Task::perform(task, |outcome| {
            ScreenMessage::ScreenMessage(StepFormMessage::Submitted(outcome))
        })
    }

    fn on_submitted(
        &mut self,
        outcome: SubmitOutcome,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        self.submitting = false;
        match outcome {
            SubmitOutcome::Advanced { record, wizard } => {
                state.wizard = wizard;
                state
                    .wizard
                    .apply(WizardAction::SetStepsCompleted(record.completed_steps()));
                state.notification = Some(Notification::success(format!(
                    "{} saved.",
                    self.step.title()
                )));
                Task::done(ScreenMessage::ParentMessage(self.next_route()))
            }
            SubmitOutcome::Updated(record) => {
                state
                    .wizard
                    .apply(WizardAction::SetStepsCompleted(record.completed_steps()));
                state.notification = Some(Notification::success(format!(
                    "{} updated.",
                    self.step.title()
                )));
                self.attachments.clear();
                self.prefill(&record);
                Task::none()
            }
            SubmitOutcome::Failed(message) => {
                state.notification = Some(Notification::failure(message));
                Task::none()
            }
        }
    }
}

impl Screen for StepFormScreen {
    type Message = StepFormMessage;
    type ParentMessage = Route;

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            StepFormMessage::Fetched(outcome) => {
                self.fetching = false;
                match &outcome {
                    FetchOutcome::Ok(record) => {
                        state
                            .wizard
                            .apply(WizardAction::SetStepsCompleted(record.completed_steps()));
                    }
                    FetchOutcome::NotFound => {
                        // The cached identifier points at nothing; drop it so
                        // submitting the fresh form creates a new application
                        // instead of posting to a dead record.
                        state.wizard.apply(WizardAction::Clear);
                        if let Err(e) = state.cache.clear() {
                            warn!(error = %e, "failed to clear progress cache");
                        }
                    }
                    FetchOutcome::Failed(_) => {}
                }
                match decide(self.step, Some(&outcome), &state.wizard) {
                    Decision::ShowCreate => {
                        self.mode = FormMode::Create;
                        Task::none()
                    }
                    Decision::ShowUpdate => {
                        self.mode = FormMode::Update;
                        if let FetchOutcome::Ok(record) = &outcome {
                            self.prefill(record);
                        }
                        Task::none()
                    }
                    Decision::Redirect(target) => Task::done(ScreenMessage::ParentMessage(
                        Route::Step(target, FormMode::Create),
                    )),
                    Decision::ShowPaymentStatus => Task::done(ScreenMessage::ParentMessage(
                        Route::Status(ReturnParams::default()),
                    )),
                    Decision::Loading => Task::none(),
                }
            }
            StepFormMessage::FieldChanged(key, value) => {
                self.values.insert(key.to_string(), value);
                Task::none()
            }
            StepFormMessage::FlagToggled(key, checked) => {
                self.values.insert(key.to_string(), checked.to_string());
                Task::none()
            }
            StepFormMessage::PickFile => {
                let photo = self.step == Step::Photo;
                Task::perform(
                    async move {
                        let mut dialog = rfd::AsyncFileDialog::new();
                        if photo {
                            dialog = dialog.add_filter("Images", &["png", "jpg", "jpeg"]);
                        }
                        dialog
                            .pick_file()
                            .await
                            .map(|handle| handle.path().to_path_buf())
                    },
                    |path| ScreenMessage::ScreenMessage(StepFormMessage::FilePicked(path)),
                )
            }
            StepFormMessage::FilePicked(path) => {
                if let Some(path) = path {
                    if self.step == Step::Photo {
                        // A single photo; a new pick replaces the old one.
                        self.attachments.clear();
                    }
                    self.attachments.push(path);
                }
                Task::none()
            }
            StepFormMessage::Submit => self.submit(state),
            StepFormMessage::Submitted(outcome) => self.on_submitted(outcome, state),
        }
    }

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        if self.fetching {
            return widgets::layout(
                text("Loading your application...").into(),
                self.step,
                &state.wizard,
            );
        }

        let mut form = column![
            text(format!("Step {} of {}", self.step.number(), Step::ALL.len())).size(14),
            text(self.step.title()).size(28),
        ]
        .spacing(10)
        .padding(20);

        for field in forms::step_fields(self.step) {
            let key = field.key;
            let value = self.values.get(key).map(String::as_str).unwrap_or("");
            let widget: Element<'a, ScreenMessage<Self>> = match field.kind {
                FieldKind::Flag => checkbox(value == "true")
                    .label(field.label)
                    .on_toggle(move |checked| {
                        ScreenMessage::ScreenMessage(StepFormMessage::FlagToggled(key, checked))
                    })
                    .into(),
                kind => {
                    let placeholder = match kind {
                        FieldKind::Date => "YYYY-MM-DD",
                        _ => field.label,
                    };
                    column![
                        text(field.label).size(14),
                        text_input(placeholder, value).on_input(move |value| {
                            ScreenMessage::ScreenMessage(StepFormMessage::FieldChanged(key, value))
                        }),
                    ]
                    .spacing(4)
                    .into()
                }
            };
            form = form.push(widget);
            if let Some(error) = self.errors.iter().find(|e| e.key == key) {
                form = form.push(text(error.message.as_str()).size(13));
            }
        }

        if self.takes_files() {
            for name in &self.uploaded {
                form = form.push(text(format!("On file: {name}")).size(14));
            }
            for path in &self.attachments {
                form = form.push(text(format!("Selected: {}", path.display())).size(14));
            }
            let label = if self.step == Step::Photo {
                "Pick photo"
            } else {
                "Add document"
            };
            form = form.push(
                button(label)
                    .on_press(ScreenMessage::ScreenMessage(StepFormMessage::PickFile)),
            );
        }

        let submit_label = match (self.mode, self.submitting) {
            (_, true) => "Saving...",
            (FormMode::Create, false) => "Save and continue",
            (FormMode::Update, false) => "Save changes",
        };
        let mut actions = row![
            button(submit_label).on_press_maybe(
                (!self.submitting).then_some(ScreenMessage::ScreenMessage(StepFormMessage::Submit)),
            )
        ]
        .spacing(10);
        if self.mode == FormMode::Update {
            actions = actions.push(
                button("Continue without changes")
                    .on_press(ScreenMessage::ParentMessage(self.next_route())),
            );
        }
        form = form.push(actions);

        widgets::layout(
            scrollable(form).width(Length::Fill).into(),
            self.step,
            &state.wizard,
        )
    }
}
