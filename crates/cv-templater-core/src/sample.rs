/// File name of the generated sample inside the source directory.
pub const SAMPLE_FILE_NAME: &str = "sample_cv.md";

pub const SAMPLE_CV: &str = r#"# John Doe
**Software Developer**

📧 john.doe@email.com | 📱 +1-234-567-8900 | 🌐 linkedin.com/in/johndoe

---

## Professional Summary

Experienced software developer with 5+ years in full-stack development, specializing in Python and JavaScript technologies. Proven track record of delivering high-quality applications and leading development teams.

## Technical Skills

- **Languages:** Python, JavaScript, TypeScript, Java
- **Frameworks:** React, Django, FastAPI, Node.js
- **Databases:** PostgreSQL, MongoDB, Redis
- **Tools:** Git, Docker, AWS, Jenkins
- **Testing:** Jest, Pytest, Selenium

## Professional Experience

### Senior Software Developer | TechCorp Inc. (2022 - Present)
- Developed and maintained web applications serving 50,000+ active users
- Led a team of 4 junior developers, providing mentorship and code reviews
- Improved system performance by 40% through optimization and caching strategies
- Implemented CI/CD pipelines reducing deployment time by 60%

### Software Developer | StartupXYZ (2020 - 2022)
- Built RESTful APIs using Python Django serving 1M+ requests daily
- Collaborated with cross-functional teams to deliver features on tight deadlines
- Implemented automated testing increasing code coverage from 60% to 95%
- Migrated legacy systems to modern cloud infrastructure

### Junior Developer | DevStudio (2019 - 2020)
- Developed responsive web interfaces using React and modern CSS
- Participated in agile development process and daily standups
- Fixed bugs and implemented minor features in existing applications

## Education

**Bachelor of Science in Computer Science**  
State University, 2019  
*Relevant Coursework: Data Structures, Algorithms, Database Systems, Software Engineering*

## Projects

### E-commerce Platform
- Full-stack application built with React frontend and Django backend
- Integrated Stripe payment processing and inventory management
- Deployed on AWS with Docker containers
- **Tech Stack:** React, Django, PostgreSQL, Redis, AWS
- **GitHub:** github.com/johndoe/ecommerce-platform

### Task Management API
- RESTful API for team task management with real-time updates
- Implemented JWT authentication and role-based permissions
- **Tech Stack:** FastAPI, SQLAlchemy, WebSocket, PostgreSQL
- **GitHub:** github.com/johndoe/task-api

## Certifications

- **AWS Certified Developer Associate** (2023)
- **Python Institute PCAP** (2022)

---

*References available upon request*
"#;
