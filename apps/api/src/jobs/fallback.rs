use crate::jobs::normalize::{JobRecord, DASH};

/// Fixed listings served when no upstream API key is configured or `mock=1` is passed.
/// Never touches the network and always returns the same three records.
pub fn sample_jobs() -> Vec<JobRecord> {
    vec![
        JobRecord {
            id: "sample-1".to_string(),
            title: "Frontend Developer".to_string(),
            company: "Acme Corp".to_string(),
            location: "Remote".to_string(),
            salary: DASH.to_string(),
            employment_type: "Full-time".to_string(),
            posted: "Recently".to_string(),
            description: "Build delightful web interfaces using React and Next.js.".to_string(),
            rating: Some(4.6),
            is_remote: true,
            is_featured: true,
            match_percent: Some(82.0),
            apply_url: Some("https://example.com/apply/frontend".to_string()),
            logo: None,
        },
        JobRecord {
            id: "sample-2".to_string(),
            title: "Backend Engineer".to_string(),
            company: "Globex".to_string(),
            location: "New York, NY".to_string(),
            salary: "$130k – $160k".to_string(),
            employment_type: "Full-time".to_string(),
            posted: "1 day ago".to_string(),
            description: "Design and scale Node.js services and APIs.".to_string(),
            rating: Some(4.2),
            is_remote: false,
            is_featured: false,
            match_percent: Some(74.0),
            apply_url: Some("https://example.com/apply/backend".to_string()),
            logo: None,
        },
        JobRecord {
            id: "sample-3".to_string(),
            title: "Data Scientist".to_string(),
            company: "Initech".to_string(),
            location: "Hybrid - San Francisco, CA".to_string(),
            salary: DASH.to_string(),
            employment_type: "Contract".to_string(),
            posted: "3 days ago".to_string(),
            description: "Build ML models and collaborate with product teams.".to_string(),
            rating: Some(4.8),
            is_remote: false,
            is_featured: false,
            match_percent: Some(67.0),
            apply_url: Some("https://example.com/apply/datasci".to_string()),
            logo: None,
        },
    ]
}
