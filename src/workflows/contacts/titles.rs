use super::fuzzy;
use super::options::TitleCatalog;
use super::outcome::{FallbackReason, FieldOutcome};

const SMALL_CATALOG: &[&str] = &["Software Developer", "Data Scientist", "Product Manager"];

const EXPANDED_CATALOG: &[&str] = &[
    // Engineering
    "Software Developer",
    "Software Engineer",
    "Senior Software Engineer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "Mobile Developer",
    "DevOps Engineer",
    "Site Reliability Engineer",
    "Cloud Architect",
    "Solutions Architect",
    "Systems Administrator",
    "Network Engineer",
    "Database Administrator",
    "Security Engineer",
    "Information Security Analyst",
    "QA Engineer",
    "Test Automation Engineer",
    "Embedded Systems Engineer",
    "Machine Learning Engineer",
    "Engineering Manager",
    "Technical Lead",
    "Chief Technology Officer",
    "IT Manager",
    "IT Support Specialist",
    "Help Desk Technician",
    // Data
    "Data Scientist",
    "Data Analyst",
    "Data Engineer",
    "Business Intelligence Analyst",
    "Statistician",
    "Research Scientist",
    // Product & design
    "Product Manager",
    "Product Owner",
    "Project Manager",
    "Program Manager",
    "Scrum Master",
    "UX Designer",
    "UI Designer",
    "Graphic Designer",
    "Technical Writer",
    // Executive
    "Chief Executive Officer",
    "Chief Operating Officer",
    "Chief Financial Officer",
    "Chief Marketing Officer",
    "Chief Information Officer",
    "President",
    "Vice President",
    "General Manager",
    "Director of Operations",
    "Operations Manager",
    "Office Manager",
    "Executive Assistant",
    "Administrative Assistant",
    "Receptionist",
    // Sales & marketing
    "Sales Representative",
    "Account Executive",
    "Account Manager",
    "Sales Manager",
    "Business Development Manager",
    "Customer Success Manager",
    "Customer Service Representative",
    "Marketing Manager",
    "Marketing Coordinator",
    "Digital Marketing Specialist",
    "Content Strategist",
    "Social Media Manager",
    "Public Relations Specialist",
    "Brand Manager",
    // Finance & legal
    "Accountant",
    "Financial Analyst",
    "Controller",
    "Bookkeeper",
    "Payroll Specialist",
    "Auditor",
    "Attorney",
    "Paralegal",
    "Compliance Officer",
    // People
    "Human Resources Manager",
    "Recruiter",
    "Talent Acquisition Specialist",
    "Training Coordinator",
    // Operations & field
    "Supply Chain Manager",
    "Logistics Coordinator",
    "Purchasing Agent",
    "Warehouse Supervisor",
    "Facilities Manager",
    "Property Manager",
    "Leasing Agent",
    "Real Estate Agent",
    "Consultant",
    "Business Analyst",
    // Healthcare & education
    "Registered Nurse",
    "Physician",
    "Pharmacist",
    "Medical Assistant",
    "Teacher",
    "Professor",
    "Intern",
];

impl TitleCatalog {
    pub fn titles(self) -> &'static [&'static str] {
        match self {
            Self::Small => SMALL_CATALOG,
            Self::Expanded => EXPANDED_CATALOG,
        }
    }
}

/// Titles are scored on at most this many leading characters.
const MAX_SCORED_CHARS: usize = 128;

/// Closest canonical title for `title`, or the input when nothing usable scores.
///
/// Without `min_score` the best candidate is always returned, however weak.
pub fn normalize_job_title(
    title: &str,
    candidates: &[&str],
    min_score: Option<u8>,
) -> FieldOutcome<String> {
    if fuzzy::full_process(title).is_empty() {
        return FieldOutcome::fallback(title, FallbackReason::Empty);
    }

    let scored: String = title.chars().take(MAX_SCORED_CHARS).collect();
    let Some(best) = fuzzy::extract_one(&scored, candidates) else {
        return FieldOutcome::fallback(title, FallbackReason::LookupMiss);
    };

    match min_score {
        Some(threshold) if best.score < threshold => {
            FieldOutcome::fallback(title, FallbackReason::WeakMatch)
        }
        _ => FieldOutcome::Transformed(best.candidate.to_string()),
    }
}
