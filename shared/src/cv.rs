//! 简历聚合模型
//!
//! `/cv/` 一次性返回个人信息与全部分组；每个分组也可以通过
//! `/cv/{section}/` 单独增删改。

use crate::portfolio::ResourceId;
use crate::schema::{Field, Resource, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: ResourceId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_current: bool,
    pub description: String,
}

impl Resource for Experience {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("title", Schema::string()),
            Field::required("company", Schema::string()),
            Field::required("location", Schema::string()),
            Field::required("start_date", Schema::string()),
            Field::with_default("end_date", Schema::nullable(Schema::string()), Value::Null),
            Field::with_default("is_current", Schema::Bool, json!(false)),
            Field::with_default("description", Schema::string(), json!("")),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: ResourceId,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_current: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

impl Resource for Education {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("degree", Schema::string()),
            Field::required("institution", Schema::string()),
            Field::required("location", Schema::string()),
            Field::required("start_date", Schema::string()),
            Field::with_default("end_date", Schema::nullable(Schema::string()), Value::Null),
            Field::with_default("is_current", Schema::Bool, json!(false)),
            Field::with_default("description", Schema::string(), json!("")),
            Field::optional("gpa", Schema::string()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvSkill {
    pub id: ResourceId,
    pub name: String,
    pub level: String,
    pub category: String,
    pub percentage: f64,
}

impl Resource for CvSkill {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("name", Schema::string()),
            Field::required("level", Schema::string()),
            Field::required("category", Schema::string()),
            Field::required("percentage", Schema::percentage()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: ResourceId,
    pub name: String,
    pub level: String,
}

impl Resource for Language {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("name", Schema::string()),
            Field::required("level", Schema::string()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub id: ResourceId,
    pub name: String,
    pub issuer: String,
    pub issue_date: String,
    pub expiry_date: Option<String>,
    pub credential_id: String,
    pub credential_url: String,
}

impl Resource for Certification {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("name", Schema::string()),
            Field::required("issuer", Schema::string()),
            Field::required("issue_date", Schema::string()),
            Field::with_default("expiry_date", Schema::nullable(Schema::string()), Value::Null),
            Field::with_default("credential_id", Schema::string(), json!("")),
            Field::with_default("credential_url", Schema::string(), json!("")),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvProject {
    pub id: ResourceId,
    pub title: String,
    pub description: String,
    /// 逗号分隔的技术栈
    pub technologies: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub is_ongoing: bool,
}

impl CvProject {
    pub fn technology_list(&self) -> Vec<&str> {
        self.technologies
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl Resource for CvProject {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("title", Schema::string()),
            Field::with_default("description", Schema::string(), json!("")),
            Field::with_default("technologies", Schema::string(), json!("")),
            Field::optional("url", Schema::string()),
            Field::optional("github_url", Schema::string()),
            Field::with_default("is_ongoing", Schema::Bool, json!(false)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interest {
    pub id: ResourceId,
    pub name: String,
    pub icon: String,
    pub description: String,
}

impl Resource for Interest {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("name", Schema::string()),
            Field::with_default("icon", Schema::string(), json!("")),
            Field::with_default("description", Schema::string(), json!("")),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub profile_image: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

impl Resource for PersonalInfo {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("full_name", Schema::string()),
            Field::required("job_title", Schema::string()),
            Field::required("email", Schema::email()),
            Field::with_default("phone", Schema::string(), json!("")),
            Field::with_default("location", Schema::string(), json!("")),
            Field::with_default("profile_image", Schema::string(), json!("")),
            Field::with_default("summary", Schema::string(), json!("")),
            Field::optional("linkedin", Schema::string()),
            Field::optional("github", Schema::string()),
        ])
    }
}

/// 完整简历
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CvData {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<CvSkill>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<CvProject>,
    #[serde(default)]
    pub interests: Vec<Interest>,
}

impl CvData {
    /// 技能按分类分组，保持首次出现的分类顺序
    pub fn skills_by_category(&self) -> Vec<(&str, Vec<&CvSkill>)> {
        let mut groups: Vec<(&str, Vec<&CvSkill>)> = Vec::new();
        for skill in &self.skills {
            match groups.iter_mut().find(|(c, _)| *c == skill.category) {
                Some((_, members)) => members.push(skill),
                None => groups.push((skill.category.as_str(), vec![skill])),
            }
        }
        groups
    }
}

impl Resource for CvData {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("personal_info", PersonalInfo::schema()),
            Field::with_default("experiences", Schema::array(Experience::schema()), json!([])),
            Field::with_default("education", Schema::array(Education::schema()), json!([])),
            Field::with_default("skills", Schema::array(CvSkill::schema()), json!([])),
            Field::with_default("languages", Schema::array(Language::schema()), json!([])),
            Field::with_default("certifications", Schema::array(Certification::schema()), json!([])),
            Field::with_default("projects", Schema::array(CvProject::schema()), json!([])),
            Field::with_default("interests", Schema::array(Interest::schema()), json!([])),
        ])
    }
}

/// 简历分组，对应 `/cv/{segment}/` 下的增删改接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvSection {
    Experiences,
    Education,
    Skills,
    Languages,
    Certifications,
    Projects,
    Interests,
}

impl CvSection {
    pub const ALL: [CvSection; 7] = [
        CvSection::Experiences,
        CvSection::Education,
        CvSection::Skills,
        CvSection::Languages,
        CvSection::Certifications,
        CvSection::Projects,
        CvSection::Interests,
    ];

    pub fn segment(&self) -> &'static str {
        match self {
            CvSection::Experiences => "experiences",
            CvSection::Education => "education",
            CvSection::Skills => "skills",
            CvSection::Languages => "languages",
            CvSection::Certifications => "certifications",
            CvSection::Projects => "projects",
            CvSection::Interests => "interests",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate;

    fn personal_info() -> Value {
        json!({
            "full_name": "Alex Doe",
            "job_title": "Engineer",
            "email": "alex@example.com"
        })
    }

    #[test]
    fn test_cv_collections_default_to_empty() {
        let cv: CvData = validate(&json!({"personal_info": personal_info()})).unwrap();
        assert_eq!(cv.personal_info.full_name, "Alex Doe");
        assert!(cv.experiences.is_empty());
        assert!(cv.interests.is_empty());
    }

    #[test]
    fn test_cv_rejects_bad_email() {
        let mut info = personal_info();
        info["email"] = json!("alex-at-example");
        let err = validate::<CvData>(&json!({"personal_info": info})).unwrap_err();
        assert!(err.has_issue_at("/personal_info/email"));
    }

    #[test]
    fn test_cv_skill_percentage_out_of_range() {
        let payload = json!({
            "personal_info": personal_info(),
            "skills": [{"id": 1, "name": "Rust", "level": "Expert", "category": "Lang", "percentage": 120}]
        });
        let err = validate::<CvData>(&payload).unwrap_err();
        assert!(err.has_issue_at("/skills/0/percentage"));
    }

    #[test]
    fn test_experience_null_end_date() {
        let exp: Experience = validate(&json!({
            "id": 3,
            "title": "Pilot",
            "company": "Skyworks",
            "location": "Remote",
            "start_date": "2021-01-01",
            "end_date": null,
            "is_current": true
        }))
        .unwrap();
        assert!(exp.end_date.is_none());
        assert!(exp.is_current);
        assert_eq!(exp.description, "");
    }

    #[test]
    fn test_skills_grouped_by_category() {
        let cv: CvData = validate(&json!({
            "personal_info": personal_info(),
            "skills": [
                {"id": 1, "name": "Rust", "level": "Expert", "category": "Languages", "percentage": 90},
                {"id": 2, "name": "Premiere", "level": "Good", "category": "Editing", "percentage": 70},
                {"id": 3, "name": "Go", "level": "Good", "category": "Languages", "percentage": 60}
            ]
        }))
        .unwrap();
        let groups = cv.skills_by_category();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Languages");
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_technology_list() {
        let project = CvProject {
            id: ResourceId::new("1"),
            title: "Folio".into(),
            description: String::new(),
            technologies: "Rust, Leptos,, WASM ".into(),
            url: None,
            github_url: None,
            is_ongoing: true,
        };
        assert_eq!(project.technology_list(), vec!["Rust", "Leptos", "WASM"]);
    }
}
