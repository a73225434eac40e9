//! KvK document extraction stub.
//!
//! The uploaded document is read as text and `key: value` lines are taken as the extracted
//! registry fields. Each status fetch advances a verification one step:
//! PENDING, PROCESSING, then VERIFIED / FLAGGED / FAILED.

use super::Register;
use crate::error::{ApiError, ApiResult};
use chrono::Utc;
use ctn::domain::models::{
    AuditAction, KvkFields, KvkVerification, ReviewDecision, ReviewRequest, VerificationReview,
    VerificationStatus,
};
use ctn::kernel::safe_nanoid;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone)]
pub struct StoredVerification {
    pub verification: KvkVerification,
    document: String,
}

fn field_key(label: &str) -> Option<&'static str> {
    let label: String = label.chars().filter(char::is_ascii_alphanumeric).collect::<String>().to_lowercase();
    match label.as_str() {
        "kvknumber" | "kvknummer" | "kvk" => Some("kvkNumber"),
        "companyname" | "handelsnaam" | "name" => Some("companyName"),
        "legalform" | "rechtsvorm" => Some("legalForm"),
        "city" | "plaats" | "vestigingsplaats" => Some("city"),
        _ => None,
    }
}

/// Registry fields found in `key: value` lines. The first value of a field wins.
#[must_use]
pub fn extract_fields(document: &str) -> KvkFields {
    let mut fields = KvkFields::default();
    for (label, value) in document.lines().filter_map(|line| line.split_once(':')) {
        let value = value.trim();
        if let Some(key) = field_key(label)
            && !value.is_empty()
            && fields.get(key).is_none()
        {
            fields.set(key, value);
        }
    }
    fields
}

fn canonical(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Keys present on both sides with different values.
fn mismatches(entered: &KvkFields, extracted: &KvkFields) -> Vec<String> {
    KvkFields::FIELDS
        .iter()
        .filter(|(key, _)| match (entered.get(key), extracted.get(key)) {
            (Some(a), Some(b)) => canonical(a) != canonical(b),
            _ => false,
        })
        .map(|(key, _)| (*key).to_owned())
        .collect()
}

impl StoredVerification {
    fn advance(&mut self) {
        let v = &mut self.verification;
        match v.status {
            VerificationStatus::Pending => v.status = VerificationStatus::Processing,
            VerificationStatus::Processing => {
                let extracted = extract_fields(&self.document);
                v.mismatches = mismatches(&v.entered, &extracted);
                v.status = if extracted.kvk_number.is_none() {
                    VerificationStatus::Failed
                } else if v.mismatches.is_empty() {
                    VerificationStatus::Verified
                } else {
                    VerificationStatus::Flagged
                };
                v.extracted = Some(extracted);
                v.completed_at = Some(Utc::now());
            },
            _ => {},
        }
    }
}

impl Register {
    /// Fields the member registered: legal name, legal form, city and the KVK identifier.
    fn entered_fields(&self, legal_entity_id: &str) -> ApiResult<KvkFields> {
        let entity = self.legal_entity(legal_entity_id)?;
        let kvk_number = self
            .identifiers
            .iter()
            .find(|i| i.legal_entity_id == legal_entity_id && i.identifier_type == "KVK")
            .map(|i| i.identifier_value.clone());
        Ok(KvkFields {
            kvk_number,
            company_name: Some(entity.primary_legal_name),
            legal_form: entity.entity_legal_form,
            city: entity.city,
        })
    }

    /// Starts a verification for an uploaded PDF.
    pub fn upload_document(
        &mut self,
        actor: &str,
        legal_entity_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> ApiResult<KvkVerification> {
        let entered = self.entered_fields(legal_entity_id)?;
        if !file_name.to_ascii_lowercase().ends_with(".pdf") || !bytes.starts_with(PDF_MAGIC) {
            return Err(ApiError::bad_request("Only PDF documents are accepted"));
        }

        let verification = KvkVerification {
            verification_id: safe_nanoid!(),
            legal_entity_id: legal_entity_id.to_owned(),
            document_name: file_name.to_owned(),
            status: VerificationStatus::Pending,
            uploaded_at: Utc::now(),
            completed_at: None,
            entered,
            extracted: None,
            mismatches: Vec::new(),
            review: None,
        };
        self.verifications.push(StoredVerification {
            verification: verification.clone(),
            document: String::from_utf8_lossy(bytes).into_owned(),
        });
        self.record(
            actor,
            AuditAction::Upload,
            "KvkVerification",
            &verification.verification_id,
            format!("Uploaded {file_name}"),
        );
        Ok(verification)
    }

    /// Latest verification of the entity, advanced one step.
    pub fn kvk_verification(&mut self, legal_entity_id: &str) -> ApiResult<KvkVerification> {
        self.legal_entity_exists(legal_entity_id)?;
        let stored = self
            .verifications
            .iter_mut()
            .rev()
            .find(|v| v.verification.legal_entity_id == legal_entity_id)
            .ok_or_else(|| ApiError::not_found("KvK verification for legal entity", legal_entity_id))?;
        stored.advance();
        Ok(stored.verification.clone())
    }

    /// Flagged verifications without a review, oldest first.
    #[must_use]
    pub fn flagged(&self) -> Vec<KvkVerification> {
        self.verifications
            .iter()
            .map(|v| &v.verification)
            .filter(|v| v.status == VerificationStatus::Flagged && v.review.is_none())
            .cloned()
            .collect()
    }

    /// Approval marks the verification verified, rejection failed.
    pub fn review(&mut self, actor: &str, verification_id: &str, input: ReviewRequest) -> ApiResult<KvkVerification> {
        let notes = input.notes.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty());
        if input.decision == ReviewDecision::Rejected && notes.is_none() {
            return Err(ApiError::bad_request("A rejection needs notes"));
        }

        let stored = self
            .verifications
            .iter_mut()
            .find(|v| v.verification.verification_id == verification_id)
            .ok_or_else(|| ApiError::not_found("Verification", verification_id))?;
        let v = &mut stored.verification;
        if v.status != VerificationStatus::Flagged || v.review.is_some() {
            return Err(ApiError::conflict("Verification is not awaiting review"));
        }

        v.status = match input.decision {
            ReviewDecision::Approved => VerificationStatus::Verified,
            ReviewDecision::Rejected => VerificationStatus::Failed,
        };
        v.review = Some(VerificationReview {
            decision: input.decision,
            notes,
            reviewed_by: actor.to_owned(),
            reviewed_at: Utc::now(),
        });
        let reviewed = v.clone();

        self.record(
            actor,
            AuditAction::Review,
            "KvkVerification",
            verification_id,
            format!("{} {}", input.decision, reviewed.document_name),
        );
        Ok(reviewed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::tests::acme;
    use ctn::domain::models::IdentifierPayload;

    const EXTRACT: &str = "%PDF-1.7\nKvK-nummer: 12345678\nHandelsnaam: Acme Logistics B.V.\n\
                           Rechtsvorm: B.V.\nVestigingsplaats: Rotterdam\n";

    fn registered(register: &mut Register) -> ApiResult<String> {
        let member = register.create_member("admin", acme())?;
        let kvk = IdentifierPayload {
            identifier_type: "KVK".into(),
            identifier_value: "12345678".into(),
            ..IdentifierPayload::default()
        };
        register.create_identifier("admin", &member.legal_entity_id, kvk)?;
        Ok(member.legal_entity_id)
    }

    #[test]
    fn extraction_reads_labelled_lines() {
        let fields = extract_fields(EXTRACT);
        assert_eq!(fields.kvk_number.as_deref(), Some("12345678"));
        assert_eq!(fields.company_name.as_deref(), Some("Acme Logistics B.V."));
        assert_eq!(fields.city.as_deref(), Some("Rotterdam"));
        assert_eq!(extract_fields("no fields here"), KvkFields::default());
    }

    #[test]
    fn status_advances_per_fetch() -> ApiResult<()> {
        let mut register = Register::default();
        let entity = registered(&mut register)?;
        register.upload_document("admin", &entity, "extract.pdf", EXTRACT.as_bytes())?;

        assert_eq!(register.kvk_verification(&entity)?.status, VerificationStatus::Processing);
        let done = register.kvk_verification(&entity)?;
        assert_eq!(done.status, VerificationStatus::Verified);
        assert!(done.mismatches.is_empty());
        assert_eq!(done.entered.kvk_number.as_deref(), Some("12345678"));
        assert_eq!(register.kvk_verification(&entity)?.status, VerificationStatus::Verified);
        Ok(())
    }

    #[test]
    fn differing_fields_are_flagged_and_reviewable() -> ApiResult<()> {
        let mut register = Register::default();
        let entity = registered(&mut register)?;
        let doc = EXTRACT.replace("Rotterdam", "Amsterdam");
        register.upload_document("admin", &entity, "extract.PDF", doc.as_bytes())?;
        register.kvk_verification(&entity)?;
        let flagged = register.kvk_verification(&entity)?;

        assert_eq!(flagged.status, VerificationStatus::Flagged);
        assert_eq!(flagged.mismatches, ["city"]);
        assert_eq!(register.flagged().len(), 1);

        let reject = ReviewRequest { decision: ReviewDecision::Rejected, notes: None };
        assert!(matches!(
            register.review("admin", &flagged.verification_id, reject),
            Err(ApiError::BadRequest { .. })
        ));

        let approve = ReviewRequest { decision: ReviewDecision::Approved, notes: None };
        let reviewed = register.review("reviewer", &flagged.verification_id, approve.clone())?;
        assert_eq!(reviewed.status, VerificationStatus::Verified);
        assert!(register.flagged().is_empty());
        assert!(matches!(
            register.review("reviewer", &flagged.verification_id, approve),
            Err(ApiError::Conflict { .. })
        ));
        Ok(())
    }

    #[test]
    fn unreadable_documents_fail() -> ApiResult<()> {
        let mut register = Register::default();
        let entity = registered(&mut register)?;
        register.upload_document("admin", &entity, "scan.pdf", b"%PDF-1.4 binary")?;
        register.kvk_verification(&entity)?;
        assert_eq!(register.kvk_verification(&entity)?.status, VerificationStatus::Failed);
        Ok(())
    }

    #[test]
    fn non_pdf_uploads_are_rejected() -> ApiResult<()> {
        let mut register = Register::default();
        let entity = registered(&mut register)?;
        let err = register.upload_document("admin", &entity, "extract.txt", EXTRACT.as_bytes());
        assert!(matches!(err, Err(ApiError::BadRequest { .. })));
        assert!(matches!(register.kvk_verification(&entity), Err(ApiError::NotFound { .. })));
        Ok(())
    }
}
