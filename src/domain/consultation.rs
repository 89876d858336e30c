//! Consultation records kept in a pet's medical history.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{format_timestamp, Clinic, ClinicResponse, Pet, PetResponse};

/// Consultation domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct Consultation {
    pub id: i32,
    pub pet_id: i32,
    pub clinic_id: i32,
    /// When the consultation took place, clinic wall time
    pub held_at: NaiveDateTime,
    pub vet_name: String,
    pub diagnosis: String,
    pub prescription: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewConsultation {
    pub pet_id: i32,
    pub clinic_id: i32,
    pub held_at: NaiveDateTime,
    pub vet_name: String,
    pub diagnosis: String,
    pub prescription: Option<String>,
    pub notes: Option<String>,
}

/// Consultation with its pet and clinic loaded
#[derive(Debug, Clone)]
pub struct ConsultationRecord {
    pub consultation: Consultation,
    pub pet: Pet,
    pub clinic: Clinic,
}

/// A pet's consultations, newest first, each with the clinic that held it
#[derive(Debug, Clone)]
pub struct ConsultationHistory {
    pub pet: Pet,
    pub entries: Vec<(Consultation, Clinic)>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsultationResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "2025-04-20T14:30:00")]
    pub data_consulta: String,
    #[schema(example = "Dra. Ana Souza")]
    pub nome_veterinario: String,
    #[schema(example = "Otite externa leve no ouvido esquerdo")]
    pub diagnostico: String,
    pub prescricao: Option<String>,
    pub observacoes: Option<String>,
    #[schema(example = 1)]
    pub id_pet: i32,
    #[schema(example = 3)]
    pub id_clinica: i32,
    pub criado_em: DateTime<Utc>,
}

impl From<Consultation> for ConsultationResponse {
    fn from(consultation: Consultation) -> Self {
        Self {
            id: consultation.id,
            data_consulta: format_timestamp(consultation.held_at),
            nome_veterinario: consultation.vet_name,
            diagnostico: consultation.diagnosis,
            prescricao: consultation.prescription,
            observacoes: consultation.notes,
            id_pet: consultation.pet_id,
            id_clinica: consultation.clinic_id,
            criado_em: consultation.created_at,
        }
    }
}

/// Consultation with full pet and clinic
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsultationDetailResponse {
    #[serde(flatten)]
    pub consulta: ConsultationResponse,
    pub pet: PetResponse,
    pub clinica: ClinicResponse,
}

impl From<ConsultationRecord> for ConsultationDetailResponse {
    fn from(record: ConsultationRecord) -> Self {
        Self {
            consulta: record.consultation.into(),
            pet: record.pet.into(),
            clinica: record.clinic.into(),
        }
    }
}

/// Name and phone of the clinic that held a consultation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClinicContactResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Clínica Vida Animal")]
    pub nome: String,
    #[schema(example = "(11) 98765-4321")]
    pub telefone: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsultationHistoryEntry {
    #[serde(flatten)]
    pub consulta: ConsultationResponse,
    pub clinica: ClinicContactResponse,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsultationHistoryResponse {
    pub pet: PetResponse,
    pub consultas: Vec<ConsultationHistoryEntry>,
}

impl From<ConsultationHistory> for ConsultationHistoryResponse {
    fn from(history: ConsultationHistory) -> Self {
        let consultas = history
            .entries
            .into_iter()
            .map(|(consultation, clinic)| ConsultationHistoryEntry {
                consulta: consultation.into(),
                clinica: ClinicContactResponse {
                    id: clinic.id,
                    nome: clinic.name,
                    telefone: clinic.phone,
                },
            })
            .collect();

        Self {
            pet: history.pet.into(),
            consultas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn consultation() -> Consultation {
        Consultation {
            id: 12,
            pet_id: 1,
            clinic_id: 3,
            held_at: NaiveDate::from_ymd_opt(2025, 4, 20)
                .and_then(|d| d.and_hms_opt(14, 30, 0))
                .unwrap(),
            vet_name: "Dra. Ana Souza".to_string(),
            diagnosis: "Otite externa leve".to_string(),
            prescription: None,
            notes: Some("Retorno em 10 dias".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_uses_wire_names() {
        let body = serde_json::to_value(ConsultationResponse::from(consultation())).unwrap();
        assert_eq!(body["data_consulta"], "2025-04-20T14:30:00");
        assert_eq!(body["nome_veterinario"], "Dra. Ana Souza");
        assert_eq!(body["prescricao"], serde_json::Value::Null);
        assert_eq!(body["id_clinica"], 3);
    }
}
