use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of practitioner a comment refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PractitionerType {
  // Medical & healthcare
  Doctor,
  Physician,
  Surgeon,
  Nurse,
  Dentist,
  Optometrist,
  Ophthalmologist,
  Pharmacist,
  Dietitian,
  Nutritionist,
  Paramedic,
  Midwife,
  Veterinarian,
  // Mental health & counseling
  Therapist,
  Counselor,
  Psychologist,
  Psychiatrist,
  SocialWorker,
  // Rehabilitation & wellness
  Physiotherapist,
  PhysicalTherapist,
  OccupationalTherapist,
  Chiropractor,
  Acupuncturist,
  MassageTherapist,
  SpeechTherapist,
  PersonalTrainer,
  FitnessCoach,
  LifeCoach,
  WellnessCoach,
  HealthCoach,
  // Education
  Teacher,
  Professor,
  Tutor,
  Instructor,
  Mentor,
  Educator,
  // Technical / specialised services
  Engineer,
  Architect,
  Technician,
  Mechanic,
  Consultant,
  Specialist,
  /// Ingested comment without a recognisable reference
  Unknown,
}

const LABELS: [(PractitionerType, &str); 43] = [
  (PractitionerType::Doctor, "doctor"),
  (PractitionerType::Physician, "physician"),
  (PractitionerType::Surgeon, "surgeon"),
  (PractitionerType::Nurse, "nurse"),
  (PractitionerType::Dentist, "dentist"),
  (PractitionerType::Optometrist, "optometrist"),
  (PractitionerType::Ophthalmologist, "ophthalmologist"),
  (PractitionerType::Pharmacist, "pharmacist"),
  (PractitionerType::Dietitian, "dietitian"),
  (PractitionerType::Nutritionist, "nutritionist"),
  (PractitionerType::Paramedic, "paramedic"),
  (PractitionerType::Midwife, "midwife"),
  (PractitionerType::Veterinarian, "veterinarian"),
  (PractitionerType::Therapist, "therapist"),
  (PractitionerType::Counselor, "counselor"),
  (PractitionerType::Psychologist, "psychologist"),
  (PractitionerType::Psychiatrist, "psychiatrist"),
  (PractitionerType::SocialWorker, "social worker"),
  (PractitionerType::Physiotherapist, "physiotherapist"),
  (PractitionerType::PhysicalTherapist, "physical therapist"),
  (PractitionerType::OccupationalTherapist, "occupational therapist"),
  (PractitionerType::Chiropractor, "chiropractor"),
  (PractitionerType::Acupuncturist, "acupuncturist"),
  (PractitionerType::MassageTherapist, "massage therapist"),
  (PractitionerType::SpeechTherapist, "speech therapist"),
  (PractitionerType::PersonalTrainer, "personal trainer"),
  (PractitionerType::FitnessCoach, "fitness coach"),
  (PractitionerType::LifeCoach, "life coach"),
  (PractitionerType::WellnessCoach, "wellness coach"),
  (PractitionerType::HealthCoach, "health coach"),
  (PractitionerType::Teacher, "teacher"),
  (PractitionerType::Professor, "professor"),
  (PractitionerType::Tutor, "tutor"),
  (PractitionerType::Instructor, "instructor"),
  (PractitionerType::Mentor, "mentor"),
  (PractitionerType::Educator, "educator"),
  (PractitionerType::Engineer, "engineer"),
  (PractitionerType::Architect, "architect"),
  (PractitionerType::Technician, "technician"),
  (PractitionerType::Mechanic, "mechanic"),
  (PractitionerType::Consultant, "consultant"),
  (PractitionerType::Specialist, "specialist"),
  (PractitionerType::Unknown, "unknown"),
];

impl PractitionerType {
  pub fn as_str(&self) -> &'static str {
    LABELS.iter().find(|(kind, _)| kind == self).map(|(_, label)| *label).unwrap_or("unknown")
  }

  /// Every selectable type, excluding the `unknown` placeholder
  pub fn options() -> impl Iterator<Item = PractitionerType> {
    LABELS.iter().map(|(kind, _)| *kind).filter(|kind| *kind != PractitionerType::Unknown)
  }
}

impl fmt::Display for PractitionerType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PractitionerType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let needle = s.trim().to_lowercase();
    LABELS
      .iter()
      .find(|(_, label)| *label == needle)
      .map(|(kind, _)| *kind)
      .ok_or_else(|| format!("unknown practitioner type '{s}'"))
  }
}

impl TryFrom<String> for PractitionerType {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<PractitionerType> for String {
  fn from(value: PractitionerType) -> Self {
    value.as_str().to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_multi_word_labels_round_trip_through_serde() {
    let json = serde_json::to_string(&PractitionerType::SocialWorker).unwrap();
    assert_eq!(json, "\"social worker\"");
    let back: PractitionerType = serde_json::from_str("\"physical therapist\"").unwrap();
    assert_eq!(back, PractitionerType::PhysicalTherapist);
  }

  #[test]
  fn test_unrecognised_label_fails_to_deserialize() {
    let result: Result<PractitionerType, _> = serde_json::from_str("\"wizard\"");
    assert!(result.is_err());
  }

  #[test]
  fn test_options_exclude_unknown() {
    assert!(PractitionerType::options().all(|kind| kind != PractitionerType::Unknown));
    assert_eq!(PractitionerType::options().count(), 42);
  }
}
