//! Seed data used when a slot is absent or unreadable at startup.
//!
//! Mirrors the mock dataset of the VITB campus portal.

use super::{
    Announcement, CampusEvent, Material, MaterialKind, Notification, Priority, Role, Task,
    TaskCategory, TaskStatus, User,
};

/// Institution code stamped on mock users.
pub const INSTITUTION_CODE: &str = "VITB";

/// The mock student account.
pub fn mock_student() -> User {
    User {
        id: "ST101".into(),
        name: "Alex Johnson".into(),
        email: "alex.j@vitb.edu.in".into(),
        role: Role::Student,
        institution_code: INSTITUTION_CODE.into(),
        department: Some("Computer Science".into()),
        student_id: Some("2023CSE015".into()),
    }
}

/// The mock faculty account.
pub fn mock_faculty() -> User {
    User {
        id: "FC204".into(),
        name: "Dr. Ramesh Kumar".into(),
        email: "ramesh.k@vitb.edu.in".into(),
        role: Role::Faculty,
        institution_code: INSTITUTION_CODE.into(),
        department: Some("Computer Science".into()),
        student_id: None,
    }
}

/// Seed announcements, newest first.
pub fn seed_announcements() -> Vec<Announcement> {
    vec![
        Announcement {
            id: "ann-1".into(),
            title: "Mid-Term Examination Schedule Released".into(),
            content: "The mid-term exams for Semester 4 start from October 15th. Check the \
                      portal for your specific timetable. Attendance above 75% is mandatory \
                      for hall ticket issuance."
                .into(),
            priority: Priority::Urgent,
            posted_by: "Registrar Office".into(),
            date: "2024-09-20".into(),
            deadline: Some("2024-10-15".into()),
            is_read: false,
        },
        Announcement {
            id: "ann-2".into(),
            title: "Google Career Launchpad Placement Drive".into(),
            content: "Google is visiting VITB for 2025 graduates. Interested students must \
                      register by Friday evening (Sept 22). Venue: Seminar Hall A."
                .into(),
            priority: Priority::Academic,
            posted_by: "Placement Cell".into(),
            date: "2024-09-18".into(),
            deadline: Some("2024-09-22".into()),
            is_read: false,
        },
        Announcement {
            id: "ann-3".into(),
            title: "Annual Tech Fest: Innovate 2024".into(),
            content: "Registrations are open for the flagship technical symposium of VITB. \
                      Hackathons, workshops and project expos."
                .into(),
            priority: Priority::Event,
            posted_by: "Student Council".into(),
            date: "2024-09-15".into(),
            deadline: None,
            is_read: true,
        },
        Announcement {
            id: "ann-4".into(),
            title: "Library Maintenance Notice".into(),
            content: "The central library will be closed this Sunday for digital inventory \
                      updates."
                .into(),
            priority: Priority::General,
            posted_by: "Librarian".into(),
            date: "2024-09-12".into(),
            deadline: None,
            is_read: true,
        },
    ]
}

/// Seed tasks, newest first.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "t1".into(),
            title: "ML Assignment 2".into(),
            due_date: "2024-09-25".into(),
            status: TaskStatus::Pending,
            category: TaskCategory::Assignment,
        },
        Task {
            id: "t2".into(),
            title: "Project Proposal Draft".into(),
            due_date: "2024-09-28".into(),
            status: TaskStatus::Pending,
            category: TaskCategory::Submission,
        },
        Task {
            id: "t3".into(),
            title: "Web Dev Lab Viva".into(),
            due_date: "2024-09-21".into(),
            status: TaskStatus::Completed,
            category: TaskCategory::Exam,
        },
    ]
}

/// Seed campus events.
pub fn seed_events() -> Vec<CampusEvent> {
    vec![
        CampusEvent {
            id: "e1".into(),
            title: "AI & Future Seminar".into(),
            organizer: "ACM Student Chapter".into(),
            date: "2024-10-02".into(),
            time: "4:00 PM".into(),
            location: "Main Auditorium".into(),
            registered: false,
            description: "Deep dive into the world of Generative AI with industry experts."
                .into(),
            image: "https://images.unsplash.com/photo-1677442136019-21780ecad995?auto=format&fit=crop&w=400&q=80".into(),
        },
        CampusEvent {
            id: "e2".into(),
            title: "Inter-College Cricket Finals".into(),
            organizer: "Sports Club".into(),
            date: "2024-09-28".into(),
            time: "10:00 AM".into(),
            location: "Sports Ground".into(),
            registered: true,
            description: "VITB vs SRM-K. Support our team!".into(),
            image: "https://images.unsplash.com/photo-1531415074968-036ba1b575da?auto=format&fit=crop&w=400&q=80".into(),
        },
        CampusEvent {
            id: "e3".into(),
            title: "Eco-Drive Plantation".into(),
            organizer: "Nature Club".into(),
            date: "2024-10-10".into(),
            time: "08:00 AM".into(),
            location: "Campus Garden".into(),
            registered: false,
            description: "Helping green the campus, one sapling at a time.".into(),
            image: "https://images.unsplash.com/photo-1542601906990-b4d3fb778b09?auto=format&fit=crop&w=400&q=80".into(),
        },
    ]
}

/// Seed course materials.
pub fn seed_materials() -> Vec<Material> {
    vec![
        Material {
            id: "m1".into(),
            subject: "Machine Learning".into(),
            title: "Lecture 1: Intro to Neural Networks".into(),
            kind: MaterialKind::Pdf,
            uploaded_by: "Dr. Ramesh Kumar".into(),
            date: "2024-09-15".into(),
            url: "#".into(),
        },
        Material {
            id: "m2".into(),
            subject: "Machine Learning".into(),
            title: "Assignment 1 Guidelines".into(),
            kind: MaterialKind::Pdf,
            uploaded_by: "Dr. Ramesh Kumar".into(),
            date: "2024-09-18".into(),
            url: "#".into(),
        },
        Material {
            id: "m3".into(),
            subject: "Compiler Design".into(),
            title: "Lexical Analysis Slides".into(),
            kind: MaterialKind::Slides,
            uploaded_by: "Prof. Sarah Chen".into(),
            date: "2024-09-10".into(),
            url: "#".into(),
        },
        Material {
            id: "m4".into(),
            subject: "Operating Systems".into(),
            title: "Process Management Notes".into(),
            kind: MaterialKind::Notes,
            uploaded_by: "Dr. V. Prasad".into(),
            date: "2024-09-22".into(),
            url: "#".into(),
        },
        Material {
            id: "m5".into(),
            subject: "Database Systems".into(),
            title: "SQL Practice Sheet".into(),
            kind: MaterialKind::Pdf,
            uploaded_by: "Dr. Anita Sharma".into(),
            date: "2024-09-20".into(),
            url: "#".into(),
        },
    ]
}

/// Notifications start empty; they are only ever synthesized.
pub fn seed_notifications() -> Vec<Notification> {
    Vec::new()
}
