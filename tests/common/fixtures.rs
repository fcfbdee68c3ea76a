use tempfile::TempDir;

use visawiz::core::cache::ProgressCache;
use visawiz::core::wizard::{Step, WizardAction, WizardState};
use visawiz::models::{
    ApplicantDetails, ApplicationRecord, BackgroundDeclarations, ContactDetails, DocumentFile,
    DocumentSet, PassportDetails, PhotoUpload, TermsAcceptance, TravelDetails,
};

pub const TEST_ID: &str = "app-123";

/// Builds a record with the given steps' sub-documents present.
pub fn record_with_steps(steps: &[Step]) -> ApplicationRecord {
    let mut record = ApplicationRecord {
        id: TEST_ID.to_string(),
        ..ApplicationRecord::default()
    };
    for step in steps {
        match step {
            Step::ApplicantDetails => {
                record.applicant_details = Some(ApplicantDetails::default());
            }
            Step::PassportDetails => record.passport_details = Some(PassportDetails::default()),
            Step::ContactDetails => record.contact_details = Some(ContactDetails::default()),
            Step::TravelDetails => record.travel_details = Some(TravelDetails::default()),
            Step::Background => record.background = Some(BackgroundDeclarations::default()),
            Step::Documents => {
                record.documents = Some(DocumentSet {
                    files: vec![DocumentFile {
                        name: "passport-scan.pdf".to_string(),
                        size: 1024,
                        uploaded_at: None,
                    }],
                });
            }
            Step::Photo => {
                record.photo = Some(PhotoUpload {
                    file_name: "photo.jpg".to_string(),
                });
            }
            Step::Terms => {
                record.terms = Some(TermsAcceptance {
                    accepted: true,
                    accepted_at: None,
                });
            }
        }
    }
    record
}

/// A record with every step present, for paid/complete scenarios.
pub fn complete_record() -> ApplicationRecord {
    record_with_steps(&Step::ALL)
}

pub fn paid_record() -> ApplicationRecord {
    let mut record = complete_record();
    record.paid = true;
    record
}

/// Wizard state with a cached identifier and the given steps completed.
pub fn wizard_with(steps: &[Step]) -> WizardState {
    let mut state = WizardState::default();
    state.apply(WizardAction::SetFormId(TEST_ID.to_string()));
    state.apply(WizardAction::SetStepsCompleted(steps.to_vec()));
    state
}

/// A progress cache backed by a temp directory. Keep the directory alive
/// for the lifetime of the cache.
pub fn temp_cache() -> (ProgressCache, TempDir) {
    let dir = TempDir::new().expect("failed to create temp directory");
    let cache = ProgressCache::new(dir.path().join("progress.json"));
    (cache, dir)
}
