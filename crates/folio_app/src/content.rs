//! Static page content
//!
//! Read-only records rendered by the sections. Loaded once from a TOML or
//! JSON file; nothing is validated beyond deserialization.

use crate::error::ContentError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the page shows
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Content {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Point on the education timeline
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Milestone {
    pub year: u16,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Skill {
    pub name: String,
    /// Static media reference
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Experience {
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub period: String,
    /// Bullet points
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Content {
    /// Load from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let content = match extension.as_deref() {
            Some("toml") => toml::from_str(&raw).map_err(|source| ContentError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            Some("json") => serde_json::from_str(&raw).map_err(|source| ContentError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            _ => return Err(ContentError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::debug!(path = %path.display(), "content loaded");
        Ok(content)
    }

    /// Placeholder content used when no file is configured
    pub fn sample() -> Self {
        let techs = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        Self {
            profile: Profile {
                name: "Alex Doe".into(),
                headline: "Full Stack Developer".into(),
                bio: "I build web applications end to end, from database schema to animated interfaces.".into(),
                image: Some("assets/profile.jpg".into()),
                email: Some("alex@example.com".into()),
            },
            education: vec![
                Education {
                    degree: "B.Tech in Computer Science & Engineering".into(),
                    institution: "State University".into(),
                    period: "2022 - 2026".into(),
                    grade: Some("CGPA 8.0".into()),
                    description: "Software development, algorithms, data structures, web development and database systems.".into(),
                },
                Education {
                    degree: "Intermediate (MPC)".into(),
                    institution: "City Junior College".into(),
                    period: "2020 - 2022".into(),
                    grade: None,
                    description: "Mathematics, Physics, and Chemistry.".into(),
                },
            ],
            milestones: vec![
                Milestone {
                    year: 2020,
                    title: "Intermediate".into(),
                    description: "Completed MPC with distinction".into(),
                },
                Milestone {
                    year: 2022,
                    title: "B.Tech Started".into(),
                    description: "Started CSE".into(),
                },
                Milestone {
                    year: 2026,
                    title: "Graduation".into(),
                    description: "Expected CGPA: 8.0+".into(),
                },
            ],
            skills: ["React", "JavaScript", "Tailwind", "Node", "Express", "MySQL"]
                .iter()
                .map(|name| Skill {
                    name: name.to_string(),
                    image: Some(format!("assets/{}.png", name.to_lowercase())),
                })
                .collect(),
            experience: vec![Experience {
                role: "Full Stack Developer Intern".into(),
                company: "Example Mentor Ltd.".into(),
                period: "2024".into(),
                description: techs(&[
                    "Built responsive React front ends backed by REST APIs.",
                    "Implemented JWT authentication and role-based access control.",
                ]),
                technologies: techs(&["React", "Node.js", "MongoDB", "JWT"]),
            }],
            projects: vec![
                Project {
                    title: "E-Commerce Platform".into(),
                    description: "Storefront with cart, checkout, and an admin dashboard.".into(),
                    technologies: techs(&["React", "Node.js", "MongoDB", "Stripe API", "JWT"]),
                    github: Some("https://github.com/example/ecommerce-platform".into()),
                    image: Some("assets/ecommerce.png".into()),
                },
                Project {
                    title: "Appointment Booking".into(),
                    description: "Booking system with department-wise faculty browsing and dashboards.".into(),
                    technologies: techs(&["Next.js", "Framer Motion"]),
                    github: Some("https://github.com/example/appointments".into()),
                    image: Some("assets/appointments.png".into()),
                },
                Project {
                    title: "Hostel Management".into(),
                    description: "Room allocation, payments, and complaint tracking for university hostels.".into(),
                    technologies: techs(&["React", "Spring Boot", "Tailwind CSS"]),
                    github: None,
                    image: Some("assets/hostel.png".into()),
                },
                Project {
                    title: "Weather Dashboard".into(),
                    description: "Forecasts for the current location.".into(),
                    technologies: techs(&["JavaScript", "Geolocation"]),
                    github: None,
                    image: None,
                },
            ],
        }
    }
}
