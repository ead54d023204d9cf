//! Demo job list loaded into an empty store on first start

/// Titles seeded in list order (slot 0 first)
pub const DEFAULT_JOB_TITLES: &[&str] = &[
    "Senior Frontend Engineer",
    "Backend Engineer (Rust)",
    "Platform Engineer",
    "Site Reliability Engineer",
    "Data Engineer",
    "Machine Learning Engineer",
    "Product Designer",
    "UX Researcher",
    "Product Manager",
    "Engineering Manager",
    "QA Automation Engineer",
    "Security Engineer",
    "Mobile Engineer (iOS)",
    "Mobile Engineer (Android)",
    "Technical Writer",
    "Developer Advocate",
    "Solutions Architect",
    "Customer Success Manager",
    "Sales Engineer",
    "Recruiter",
    "People Operations Partner",
    "Finance Analyst",
    "Data Analyst",
    "Support Engineer",
    "Office Manager",
];
