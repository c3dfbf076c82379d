//! Built-in field table for application and customer-survey forms.

use super::{Choice, FieldDef, KindName, RuleDef};

fn rules(patterns: &[&str]) -> Vec<RuleDef> {
    patterns.iter().map(|p| RuleDef::new(*p)).collect()
}

fn employment_types() -> Vec<Choice> {
    vec![
        Choice::new("Full-time", &["full time", "fulltime", "ft", "permanent"]),
        Choice::new("Part-time", &["part time", "parttime", "pt"]),
        Choice::new("Contract", &["contractor", "freelance", "consultant"]),
        Choice::new("Internship", &["intern"]),
        Choice::new("Temporary", &["temp", "seasonal"]),
    ]
}

fn degree_levels() -> Vec<Choice> {
    vec![
        Choice::new("High School", &["high school diploma", "ged", "secondary"]),
        Choice::new("Associate", &["associate's", "associates", "aa", "as"]),
        Choice::new(
            "Bachelor's",
            &["bachelor", "bachelors", "ba", "bs", "bsc", "b.a.", "b.s.", "undergraduate"],
        ),
        Choice::new(
            "Master's",
            &["master", "masters", "ma", "ms", "msc", "mba", "m.a.", "m.s."],
        ),
        Choice::new("Doctorate", &["phd", "ph.d.", "doctoral", "doctor", "md", "jd"]),
    ]
}

fn yes_no() -> Vec<Choice> {
    vec![
        Choice::new("Yes", &["y", "definitely", "absolutely", "true"]),
        Choice::new("No", &["n", "never", "false"]),
        Choice::new("Maybe", &["not sure", "unsure", "possibly"]),
    ]
}

/// Field definitions used when the configuration declares none.
///
/// Within each field the first pattern is the preferred label; the rest are fallbacks.
pub fn default_field_defs() -> Vec<FieldDef> {
    vec![
        // Personal information
        FieldDef::new(
            "name",
            KindName::Text,
            rules(&[
                r"Name:\s*([^\n]+)",
                r"Full Name:\s*([^\n]+)",
                r"Applicant Name:\s*([^\n]+)",
            ]),
        ),
        FieldDef::new(
            "email",
            KindName::Email,
            rules(&[
                r"Email(?:\s+Address)?:\s*([^\s]+@[^\s]+)",
                r"E-mail:\s*([^\s]+@[^\s]+)",
            ]),
        ),
        FieldDef::new(
            "phone",
            KindName::Phone,
            rules(&[
                r"Phone(?:\s+Number)?:\s*([^\n]+)",
                r"Telephone:\s*([^\n]+)",
                r"Contact Number:\s*([^\n]+)",
            ]),
        ),
        FieldDef::new(
            "address",
            KindName::Text,
            vec![
                RuleDef::new(r"^[ \t]*(?:Home\s+|Street\s+|Residential\s+)?Address:\s*([^\n]+)")
                    .multiline(),
                RuleDef::new(r"Mailing Address:\s*([^\n]+)"),
            ],
        ),
        FieldDef::new(
            "date_of_birth",
            KindName::Date,
            rules(&[
                r"Date of Birth:\s*([^\n]+)",
                r"DOB:\s*([^\n]+)",
                r"Birth Date:\s*([^\n]+)",
            ]),
        ),
        FieldDef::new(
            "ssn",
            KindName::Text,
            rules(&[
                r"Social Security Number:\s*([^\n]+)",
                r"SSN:\s*([^\n]+)",
            ]),
        ),
        // Position
        FieldDef::new(
            "position",
            KindName::Text,
            rules(&[
                r"Position Applied For:\s*([^\n]+)",
                r"Job Title:\s*([^\n]+)",
                r"Position:\s*([^\n]+)",
            ]),
        ),
        FieldDef::new(
            "salary",
            KindName::Numeric,
            rules(&[
                r"Desired Salary:\s*([^\n]+)",
                r"Expected Salary:\s*([^\n]+)",
                r"Salary Expectation:\s*([^\n]+)",
            ]),
        ),
        FieldDef::new(
            "experience",
            KindName::Numeric,
            rules(&[
                r"Years of Experience:\s*([^\n]+)",
                r"Experience:\s*([^\n]+)",
                r"Work Experience:\s*([^\n]+)",
            ]),
        ),
        FieldDef::new(
            "availability",
            KindName::Date,
            rules(&[r"Availability:\s*([^\n]+)", r"Start Date:\s*([^\n]+)"]),
        ),
        FieldDef::new(
            "employment_type",
            KindName::Enumerated,
            rules(&[
                r"Employment Type:\s*([^\n]+)",
                r"Position Type:\s*([^\n]+)",
            ]),
        )
        .with_choices(employment_types()),
        // Education
        FieldDef::new(
            "degree",
            KindName::Enumerated,
            rules(&[
                r"Highest Degree:\s*([^\n]+)",
                r"Degree:\s*([^\n]+)",
                r"Education Level:\s*([^\n]+)",
            ]),
        )
        .with_choices(degree_levels()),
        FieldDef::new(
            "major",
            KindName::Text,
            rules(&[
                r"Major/Field of Study:\s*([^\n]+)",
                r"Major:\s*([^\n]+)",
                r"Field of Study:\s*([^\n]+)",
            ]),
        ),
        FieldDef::new(
            "institution",
            KindName::Text,
            rules(&[
                r"Institution:\s*([^\n]+)",
                r"University:\s*([^\n]+)",
                r"School:\s*([^\n]+)",
            ]),
        ),
        FieldDef::new(
            "graduation_year",
            KindName::Numeric,
            rules(&[r"Graduation Year:\s*([^\n]+)", r"Grad Year:\s*([^\n]+)"]),
        ),
        FieldDef::new(
            "gpa",
            KindName::Numeric,
            rules(&[r"GPA:\s*([^\n]+)", r"Grade Point Average:\s*([^\n]+)"]),
        ),
        // Customer survey
        FieldDef::new(
            "customer_name",
            KindName::Text,
            rules(&[r"Customer Name:\s*([^\n]+)"]),
        ),
        FieldDef::new(
            "purchase_date",
            KindName::Date,
            rules(&[r"Purchase Date:\s*([^\n]+)"]),
        ),
        FieldDef::new(
            "product",
            KindName::Text,
            rules(&[r"Product(?:\s+Purchased)?:\s*([^\n]+)"]),
        ),
        FieldDef::new(
            "rating",
            KindName::Numeric,
            rules(&[
                r"(?:Overall\s+)?(?:Satisfaction\s+)?Rating:\s*([^\n]+)",
                r"Rate.*?:\s*([^\n]+)",
            ]),
        ),
        FieldDef::new(
            "recommend",
            KindName::Enumerated,
            rules(&[
                r"Would Recommend:\s*([^\n]+)",
                r"Recommendation:\s*([^\n]+)",
            ]),
        )
        .with_choices(yes_no()),
        FieldDef::new(
            "customer_id",
            KindName::Text,
            rules(&[r"Customer ID:\s*([^\n]+)", r"ID:\s*([^\n]+)"]),
        ),
    ]
}
