//! Static seed data standing in for a database.

use chrono::{DateTime, NaiveDate, Utc};

use super::Collection;
use crate::models::{
    Employee, EmployeeRole, EmployeeStatus, Gender, Medication, Patient, Prescription,
    PrescriptionStatus,
};

// Seed dates are literals; out-of-range values are a programming error caught by the tests below.
fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

#[allow(clippy::too_many_arguments)]
fn patient(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    dob: NaiveDate,
    gender: Gender,
    history: &str,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
) -> Patient {
    Patient {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        phone: phone.into(),
        date_of_birth: dob,
        gender,
        medical_history: Some(history.into()),
        created_at: created,
        updated_at: updated,
    }
}

/// Seed patients: 5 records, 3 female and 2 male.
pub fn patients() -> Collection<Patient> {
    vec![
        patient(
            "1",
            "María González",
            "maria.gonzalez@email.com",
            "+34 612 345 678",
            date(1985, 3, 15),
            Gender::Female,
            "Historia de acné moderado. Alergia a penicilina.",
            midnight(2024, 1, 15),
            midnight(2024, 1, 20),
        ),
        patient(
            "2",
            "Carlos Rodríguez",
            "carlos.rodriguez@email.com",
            "+34 623 456 789",
            date(1978, 7, 22),
            Gender::Male,
            "Tratamiento para psoriasis. Sin alergias conocidas.",
            midnight(2024, 1, 10),
            midnight(2024, 1, 18),
        ),
        patient(
            "3",
            "Ana Martínez",
            "ana.martinez@email.com",
            "+34 634 567 890",
            date(1992, 11, 30),
            Gender::Female,
            "Consulta por melasma. Embarazada - 24 semanas.",
            midnight(2024, 2, 1),
            midnight(2024, 2, 1),
        ),
        patient(
            "4",
            "Pedro Sánchez",
            "pedro.sanchez@email.com",
            "+34 645 678 901",
            date(1980, 5, 14),
            Gender::Male,
            "Cáncer de piel en remisión. Seguimiento trimestral.",
            midnight(2023, 12, 5),
            midnight(2024, 1, 25),
        ),
        patient(
            "5",
            "Laura Fernández",
            "laura.fernandez@email.com",
            "+34 656 789 012",
            date(1995, 9, 8),
            Gender::Female,
            "Acné quístico. En tratamiento con isotretinoína.",
            midnight(2024, 1, 28),
            midnight(2024, 2, 5),
        ),
    ]
    .into()
}

#[allow(clippy::too_many_arguments)]
fn employee(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    specialty: &str,
    role: EmployeeRole,
    hired: NaiveDate,
    status: EmployeeStatus,
) -> Employee {
    Employee {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        phone: phone.into(),
        specialty: Some(specialty.into()),
        role,
        hire_date: hired,
        status,
    }
}

/// Seed staff: 5 records, 3 doctors, 1 nurse, 1 administrative; 3 active and 2 inactive.
pub fn employees() -> Collection<Employee> {
    use EmployeeRole::*;
    use EmployeeStatus::*;

    vec![
        employee(
            "1",
            "Dra. Rosa López",
            "rosa.lopez@davossalud.com",
            "+34 611 222 333",
            "Dermatología Estética",
            Doctor,
            date(2020, 3, 15),
            Active,
        ),
        employee(
            "2",
            "Dr. Carlos Mendez",
            "carlos.mendez@davossalud.com",
            "+34 622 333 444",
            "Cirugía Dermatológica",
            Doctor,
            date(2019, 8, 22),
            Active,
        ),
        employee(
            "3",
            "Enf. Marta Rodríguez",
            "marta.rodriguez@davossalud.com",
            "+34 633 444 555",
            "Enfermería Dermatológica",
            Nurse,
            date(2021, 1, 10),
            Active,
        ),
        employee(
            "4",
            "Ana García",
            "ana.garcia@davossalud.com",
            "+34 644 555 666",
            "Recepcionista",
            Administrative,
            date(2022, 5, 20),
            Inactive,
        ),
        employee(
            "5",
            "Dr. Javier Ruiz",
            "javier.ruiz@davossalud.com",
            "+34 655 666 777",
            "Dermatología Pediátrica",
            Doctor,
            date(2018, 11, 30),
            Inactive,
        ),
    ]
    .into()
}

fn medication(
    id: &str,
    name: &str,
    dosage: &str,
    frequency: &str,
    duration: &str,
    how: &str,
) -> Medication {
    Medication {
        id: id.into(),
        name: name.into(),
        dosage: dosage.into(),
        frequency: frequency.into(),
        duration: duration.into(),
        instructions: Some(how.into()),
    }
}

/// Seed prescriptions: one active, one completed.
pub fn prescriptions() -> Collection<Prescription> {
    vec![
        Prescription {
            id: "1".into(),
            patient_id: "1".into(),
            patient_name: "María González".into(),
            doctor_id: "1".into(),
            doctor_name: "Dra. Rosa López".into(),
            medications: vec![
                medication(
                    "1",
                    "Peróxido de benzoílo",
                    "5%",
                    "Una vez al día",
                    "8 semanas",
                    "Aplicar fina capa en áreas afectadas",
                ),
                medication(
                    "2",
                    "Clindamicina tópica",
                    "1%",
                    "Dos veces al día",
                    "6 semanas",
                    "Aplicar después del peróxido de benzoílo",
                ),
            ],
            diagnosis: "Acné moderado con inflamación".into(),
            instructions: "Aplicar crema por la noche después de lavar el rostro. Evitar exposición al sol. Usar protector solar SPF 50+ durante el día.".into(),
            date: date(2024, 2, 15),
            status: PrescriptionStatus::Active,
            follow_up_date: Some(date(2024, 4, 15)),
            notes: Some("Paciente con piel sensible. Monitorear posible irritación.".into()),
        },
        Prescription {
            id: "2".into(),
            patient_id: "2".into(),
            patient_name: "Carlos Rodríguez".into(),
            doctor_id: "2".into(),
            doctor_name: "Dr. Carlos Mendez".into(),
            medications: vec![
                medication(
                    "1",
                    "Betametasona pomada",
                    "0.1%",
                    "Dos veces al día",
                    "4 semanas",
                    "Aplicar capa delgada en placas",
                ),
                medication(
                    "2",
                    "Emoliente base de urea",
                    "10%",
                    "Tres veces al día",
                    "8 semanas",
                    "Aplicar en toda la piel después del baño",
                ),
            ],
            diagnosis: "Psoriasis en placas moderada".into(),
            instructions: "Aplicar pomada después del baño. Hidratar piel regularmente. Evitar rascado.".into(),
            date: date(2024, 2, 10),
            status: PrescriptionStatus::Completed,
            follow_up_date: None,
            notes: Some("Buena respuesta al tratamiento inicial.".into()),
        },
    ]
    .into()
}
