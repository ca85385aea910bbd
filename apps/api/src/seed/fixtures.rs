//! Fixed demo roster: recruiters with their companies, candidates at three
//! levels of profile completeness, and the job templates posted by every
//! company.

use crate::models::profile::EducationStatus;

pub const DEFAULT_PASSWORD: &str = "ginga@2024";

pub struct CompanyFixture {
    pub name: &'static str,
    pub cnpj: &'static str,
    pub website: &'static str,
    pub description: &'static str,
}

pub struct RecruiterFixture {
    pub username: &'static str,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub companies: &'static [CompanyFixture],
}

pub struct ExperienceFixture {
    pub company: &'static str,
    pub role: &'static str,
    pub description: &'static str,
}

pub struct EducationFixture {
    pub institution: &'static str,
    pub course: &'static str,
    pub status: EducationStatus,
}

pub struct CandidateFixture {
    pub username: &'static str,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub bio: &'static str,
    pub city: &'static str,
    pub skills: &'static str,
    pub github_url: &'static str,
    pub linkedin_url: &'static str,
    pub experiences: &'static [ExperienceFixture],
    pub education: &'static [EducationFixture],
}

pub struct JobTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub requirements: &'static str,
    pub salary_range: &'static str,
    pub tags: &'static [&'static str],
}

const fn candidate(
    username: &'static str,
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
) -> CandidateFixture {
    CandidateFixture {
        username,
        email,
        first_name,
        last_name,
        bio: "",
        city: "",
        skills: "",
        github_url: "",
        linkedin_url: "",
        experiences: &[],
        education: &[],
    }
}

const fn mid_level(
    username: &'static str,
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    bio: &'static str,
    city: &'static str,
    skills: &'static str,
) -> CandidateFixture {
    CandidateFixture {
        bio,
        city,
        skills,
        ..candidate(username, email, first_name, last_name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiters
// ────────────────────────────────────────────────────────────────────────────

pub const RECRUITERS: &[RecruiterFixture] = &[
    RecruiterFixture {
        username: "recrutador_master",
        email: "master@techcorp.com.br",
        first_name: "Carlos",
        last_name: "Mendes",
        companies: &[
            CompanyFixture {
                name: "TechCorp Brasil",
                cnpj: "12.345.678/0001-01",
                website: "https://techcorp.com.br",
                description: "Líder em soluções de tecnologia corporativa no Brasil.",
            },
            CompanyFixture {
                name: "DataFlow Solutions",
                cnpj: "12.345.678/0001-02",
                website: "https://dataflow.io",
                description: "Especialistas em Big Data e Analytics.",
            },
        ],
    },
    RecruiterFixture {
        username: "recrutador_ana",
        email: "ana.rh@inovabr.com.br",
        first_name: "Ana",
        last_name: "Silva",
        companies: &[CompanyFixture {
            name: "InovaBR Tech",
            cnpj: "23.456.789/0001-03",
            website: "https://inovabr.tech",
            description: "Startup de inovação em fintech.",
        }],
    },
    RecruiterFixture {
        username: "recrutador_pedro",
        email: "pedro@cloudnine.dev",
        first_name: "Pedro",
        last_name: "Oliveira",
        companies: &[
            CompanyFixture {
                name: "CloudNine Development",
                cnpj: "34.567.890/0001-04",
                website: "https://cloudnine.dev",
                description: "Consultoria especializada em cloud computing.",
            },
            CompanyFixture {
                name: "DevOps Masters",
                cnpj: "34.567.890/0001-05",
                website: "https://devopsmasters.io",
                description: "Automação e infraestrutura como código.",
            },
            CompanyFixture {
                name: "API Factory",
                cnpj: "34.567.890/0001-06",
                website: "https://apifactory.com.br",
                description: "Desenvolvimento de APIs RESTful e GraphQL.",
            },
        ],
    },
    RecruiterFixture {
        username: "recrutador_maria",
        email: "maria@fintechplus.com.br",
        first_name: "Maria",
        last_name: "Santos",
        companies: &[
            CompanyFixture {
                name: "Fintech Plus",
                cnpj: "45.678.901/0001-07",
                website: "https://fintechplus.com.br",
                description: "Soluções financeiras digitais.",
            },
            CompanyFixture {
                name: "PaySimple Brasil",
                cnpj: "45.678.901/0001-08",
                website: "https://paysimple.com.br",
                description: "Plataforma de pagamentos simplificados.",
            },
        ],
    },
    RecruiterFixture {
        username: "recrutador_lucas",
        email: "lucas@gamedev.studio",
        first_name: "Lucas",
        last_name: "Ferreira",
        companies: &[CompanyFixture {
            name: "GameDev Studio",
            cnpj: "56.789.012/0001-09",
            website: "https://gamedev.studio",
            description: "Desenvolvimento de jogos mobile e PC.",
        }],
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Candidates
// ────────────────────────────────────────────────────────────────────────────

/// Complete profiles with experience and education.
pub const STRONG_CANDIDATES: &[CandidateFixture] = &[
    CandidateFixture {
        username: "flavio_senior",
        email: "flavio.expert@email.com",
        first_name: "Flávio",
        last_name: "Rodrigues",
        bio: "Desenvolvedor Sênior com mais de 10 anos de experiência em arquiteturas escaláveis. Apaixonado por Clean Code, TDD e metodologias ágeis.",
        city: "São Paulo, SP",
        skills: "Python, Django, PostgreSQL, Docker, AWS, Kubernetes, FastAPI",
        github_url: "https://github.com/flaviorodrigues",
        linkedin_url: "https://linkedin.com/in/flaviorodrigues",
        experiences: &[
            ExperienceFixture {
                company: "Global Tech",
                role: "Senior Software Engineer",
                description: "Liderança técnica de equipe de 8 desenvolvedores. Arquitetura de microsserviços processando 1M+ requests/dia.",
            },
            ExperienceFixture {
                company: "StartupXYZ",
                role: "Tech Lead",
                description: "Definição de stack tecnológico e mentoria de desenvolvedores júnior.",
            },
            ExperienceFixture {
                company: "MegaCorp Brasil",
                role: "Desenvolvedor Pleno",
                description: "Desenvolvimento de APIs RESTful e integrações com sistemas legados.",
            },
        ],
        education: &[
            EducationFixture {
                institution: "USP",
                course: "Ciência da Computação",
                status: EducationStatus::Completed,
            },
            EducationFixture {
                institution: "MIT (Online)",
                course: "Machine Learning",
                status: EducationStatus::Completed,
            },
        ],
    },
    CandidateFixture {
        username: "carolina_fullstack",
        email: "carolina.dev@email.com",
        first_name: "Carolina",
        last_name: "Almeida",
        bio: "Full Stack Developer especializada em React e Node.js. Certificada AWS Solutions Architect.",
        city: "Rio de Janeiro, RJ",
        skills: "JavaScript, TypeScript, React, Node.js, MongoDB, AWS, GraphQL",
        github_url: "https://github.com/carolinaalmeida",
        linkedin_url: "https://linkedin.com/in/carolinaalmeida",
        experiences: &[
            ExperienceFixture {
                company: "Nubank",
                role: "Full Stack Developer",
                description: "Desenvolvimento de features para o app principal com milhões de usuários.",
            },
            ExperienceFixture {
                company: "iFood",
                role: "Frontend Developer",
                description: "Otimização de performance e acessibilidade do marketplace.",
            },
        ],
        education: &[
            EducationFixture {
                institution: "PUC-Rio",
                course: "Engenharia de Software",
                status: EducationStatus::Completed,
            },
            EducationFixture {
                institution: "AWS",
                course: "Solutions Architect Professional",
                status: EducationStatus::Completed,
            },
        ],
    },
    CandidateFixture {
        username: "rafael_devops",
        email: "rafael.ops@email.com",
        first_name: "Rafael",
        last_name: "Costa",
        bio: "DevOps Engineer com foco em automação e observabilidade. Especialista em Kubernetes e Terraform.",
        city: "Belo Horizonte, MG",
        skills: "Docker, Kubernetes, Terraform, AWS, Azure, Jenkins, Prometheus, Grafana",
        github_url: "https://github.com/rafaelcosta",
        linkedin_url: "https://linkedin.com/in/rafaelcosta",
        experiences: &[
            ExperienceFixture {
                company: "Banco Inter",
                role: "Senior DevOps Engineer",
                description: "Implementação de pipelines CI/CD e infraestrutura como código.",
            },
            ExperienceFixture {
                company: "Locaweb",
                role: "SRE",
                description: "Garantia de disponibilidade 99.99% para serviços críticos.",
            },
        ],
        education: &[
            EducationFixture {
                institution: "UFMG",
                course: "Sistemas de Informação",
                status: EducationStatus::Completed,
            },
            EducationFixture {
                institution: "Linux Foundation",
                course: "Certified Kubernetes Administrator",
                status: EducationStatus::Completed,
            },
        ],
    },
    CandidateFixture {
        username: "juliana_data",
        email: "juliana.data@email.com",
        first_name: "Juliana",
        last_name: "Martins",
        bio: "Data Scientist com PhD em Estatística. Experiência em ML/AI aplicado a problemas de negócio.",
        city: "Campinas, SP",
        skills: "Python, Pandas, Scikit-learn, TensorFlow, PyTorch, SQL, Spark",
        github_url: "https://github.com/julianamartins",
        linkedin_url: "https://linkedin.com/in/julianamartins",
        experiences: &[
            ExperienceFixture {
                company: "Itaú Unibanco",
                role: "Senior Data Scientist",
                description: "Modelos de credit scoring e detecção de fraude.",
            },
            ExperienceFixture {
                company: "Magazine Luiza",
                role: "Data Scientist",
                description: "Sistema de recomendação de produtos com aumento de 15% nas vendas.",
            },
        ],
        education: &[
            EducationFixture {
                institution: "Unicamp",
                course: "Doutorado em Estatística",
                status: EducationStatus::Completed,
            },
            EducationFixture {
                institution: "Stanford Online",
                course: "Deep Learning Specialization",
                status: EducationStatus::Completed,
            },
        ],
    },
    CandidateFixture {
        username: "bruno_mobile",
        email: "bruno.mobile@email.com",
        first_name: "Bruno",
        last_name: "Nascimento",
        bio: "Mobile Developer com expertise em Flutter e React Native. Foco em UX e performance.",
        city: "Curitiba, PR",
        skills: "Flutter, Dart, React Native, TypeScript, Firebase, iOS, Android",
        github_url: "https://github.com/brunonascimento",
        linkedin_url: "https://linkedin.com/in/brunonascimento",
        experiences: &[
            ExperienceFixture {
                company: "99",
                role: "Senior Mobile Developer",
                description: "Desenvolvimento do app de motoristas com 500k+ usuários ativos.",
            },
            ExperienceFixture {
                company: "PicPay",
                role: "Mobile Developer",
                description: "Features de pagamento e wallet digital.",
            },
        ],
        education: &[
            EducationFixture {
                institution: "UTFPR",
                course: "Análise e Desenvolvimento de Sistemas",
                status: EducationStatus::Completed,
            },
            EducationFixture {
                institution: "Google",
                course: "Flutter Development Bootcamp",
                status: EducationStatus::Completed,
            },
        ],
    },
    CandidateFixture {
        username: "amanda_security",
        email: "amanda.sec@email.com",
        first_name: "Amanda",
        last_name: "Lima",
        bio: "Security Engineer com certificações CISSP e CEH. Especialista em AppSec e DevSecOps.",
        city: "Brasília, DF",
        skills: "Python, Linux, Docker, AWS, OAuth 2.0, JWT, OWASP, Burp Suite",
        github_url: "https://github.com/amandalima",
        linkedin_url: "https://linkedin.com/in/amandalima",
        experiences: &[
            ExperienceFixture {
                company: "Banco do Brasil",
                role: "Senior Security Engineer",
                description: "Implementação de políticas de segurança e resposta a incidentes.",
            },
            ExperienceFixture {
                company: "Serpro",
                role: "Security Analyst",
                description: "Análise de vulnerabilidades em sistemas governamentais.",
            },
        ],
        education: &[
            EducationFixture {
                institution: "UnB",
                course: "Ciência da Computação",
                status: EducationStatus::Completed,
            },
            EducationFixture {
                institution: "ISC2",
                course: "CISSP Certification",
                status: EducationStatus::Completed,
            },
        ],
    },
    CandidateFixture {
        username: "thiago_backend",
        email: "thiago.back@email.com",
        first_name: "Thiago",
        last_name: "Pereira",
        bio: "Backend Developer com foco em sistemas distribuídos e alta disponibilidade.",
        city: "Porto Alegre, RS",
        skills: "Java, Spring Boot, Kotlin, PostgreSQL, Redis, Kafka, Microservices",
        github_url: "https://github.com/thiagopereira",
        linkedin_url: "https://linkedin.com/in/thiagopereira",
        experiences: &[
            ExperienceFixture {
                company: "Mercado Livre",
                role: "Senior Backend Developer",
                description: "Desenvolvimento de serviços de checkout processando R$1B+ por mês.",
            },
            ExperienceFixture {
                company: "Dell",
                role: "Software Engineer",
                description: "Sistemas de gestão de supply chain.",
            },
        ],
        education: &[
            EducationFixture {
                institution: "UFRGS",
                course: "Engenharia de Computação",
                status: EducationStatus::Completed,
            },
            EducationFixture {
                institution: "Oracle",
                course: "Java SE 11 Developer",
                status: EducationStatus::Completed,
            },
        ],
    },
];

/// Bio, city and skills only.
pub const MID_LEVEL_CANDIDATES: &[CandidateFixture] = &[
    mid_level("lucas_junior", "lucas.junior@email.com", "Lucas", "Souza",
        "Desenvolvedor júnior buscando primeira oportunidade na área.", "São Paulo, SP",
        "Python, Django, Git"),
    mid_level("mariana_trainee", "mariana.trainee@email.com", "Mariana", "Ferreira",
        "Recém-formada em Sistemas de Informação.", "Rio de Janeiro, RJ",
        "JavaScript, React, HTML"),
    mid_level("gabriel_pleno", "gabriel.pleno@email.com", "Gabriel", "Santos",
        "Desenvolvedor pleno com 2 anos de experiência.", "Belo Horizonte, MG",
        "Java, Spring Boot, MySQL"),
    mid_level("fernanda_dev", "fernanda.dev@email.com", "Fernanda", "Oliveira",
        "Frontend developer em transição de carreira.", "Curitiba, PR",
        "Vue.js, CSS, Tailwind CSS"),
    mid_level("ricardo_backend", "ricardo.back@email.com", "Ricardo", "Lima",
        "Backend developer focado em APIs.", "Salvador, BA",
        "Node.js, Express, MongoDB"),
    mid_level("patricia_qa", "patricia.qa@email.com", "Patrícia", "Costa",
        "Analista de QA buscando transição para desenvolvimento.", "Fortaleza, CE",
        "Selenium, Cypress, Python"),
    mid_level("diego_mobile", "diego.mob@email.com", "Diego", "Alves",
        "Desenvolvedor mobile iniciante.", "Recife, PE",
        "Flutter, Dart, Firebase"),
    mid_level("camila_frontend", "camila.front@email.com", "Camila", "Rocha",
        "Frontend developer com interesse em UX.", "Goiânia, GO",
        "React, TypeScript, Figma"),
];

/// Name and email only; they never receive applications.
pub const INCOMPLETE_CANDIDATES: &[CandidateFixture] = &[
    candidate("user_incompleto_1", "incomplete1@email.com", "João", "Silva"),
    candidate("user_incompleto_2", "incomplete2@email.com", "Maria", "Santos"),
    candidate("user_incompleto_3", "incomplete3@email.com", "Pedro", "Oliveira"),
    candidate("user_incompleto_4", "incomplete4@email.com", "Ana", "Costa"),
    candidate("user_incompleto_5", "incomplete5@email.com", "Carlos", "Lima"),
];

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

pub const JOB_TEMPLATES: &[JobTemplate] = &[
    JobTemplate {
        title: "Desenvolvedor Backend Sênior",
        description: "Buscamos um desenvolvedor backend sênior para liderar o desenvolvimento de APIs escaláveis e microsserviços.",
        requirements: "- 5+ anos de experiência com desenvolvimento backend\n- Experiência com arquitetura de microsserviços\n- Experiência com containerização (Docker/Kubernetes)",
        salary_range: "R$ 15.000 - R$ 22.000",
        tags: &["Python", "Django", "PostgreSQL", "Docker", "AWS"],
    },
    JobTemplate {
        title: "Full Stack Developer Pleno",
        description: "Procuramos desenvolvedor full stack para atuar no desenvolvimento de novas features e manutenção de nossa plataforma.",
        requirements: "- 3+ anos de experiência com desenvolvimento web\n- Conhecimento em React ou Vue.js\n- Experiência com Node.js ou Python",
        salary_range: "R$ 8.000 - R$ 12.000",
        tags: &["JavaScript", "React", "Node.js", "TypeScript", "MongoDB"],
    },
    JobTemplate {
        title: "DevOps Engineer",
        description: "Responsável por implementar e manter nossa infraestrutura na nuvem e pipelines de CI/CD.",
        requirements: "- Experiência com AWS ou GCP\n- Conhecimento em Terraform e Ansible\n- Experiência com Kubernetes",
        salary_range: "R$ 12.000 - R$ 18.000",
        tags: &["Docker", "Kubernetes", "AWS", "Terraform", "Linux"],
    },
    JobTemplate {
        title: "Data Scientist",
        description: "Buscamos cientista de dados para desenvolver modelos de machine learning e gerar insights a partir de grandes volumes de dados.",
        requirements: "- Mestrado ou Doutorado em área quantitativa\n- Experiência com Python e bibliotecas de ML\n- Experiência com SQL",
        salary_range: "R$ 14.000 - R$ 20.000",
        tags: &["Python", "Pandas", "Scikit-learn", "TensorFlow", "SQL"],
    },
    JobTemplate {
        title: "Frontend Developer React",
        description: "Desenvolvedor frontend para criar interfaces modernas e responsivas utilizando React e TypeScript.",
        requirements: "- 2+ anos com React\n- Conhecimento em TypeScript\n- Familiaridade com testes unitários",
        salary_range: "R$ 7.000 - R$ 11.000",
        tags: &["React", "TypeScript", "Tailwind CSS", "JavaScript", "Git"],
    },
    JobTemplate {
        title: "Mobile Developer Flutter",
        description: "Desenvolvedor mobile para criar e manter aplicativos multiplataforma utilizando Flutter.",
        requirements: "- 2+ anos com desenvolvimento mobile\n- Experiência com Flutter e Dart\n- Apps publicados na Play Store ou App Store",
        salary_range: "R$ 9.000 - R$ 14.000",
        tags: &["Flutter", "Dart", "Firebase", "Android", "iOS"],
    },
    JobTemplate {
        title: "Security Engineer",
        description: "Engenheiro de segurança para implementar práticas de DevSecOps e garantir a segurança de nossas aplicações.",
        requirements: "- Experiência com segurança de aplicações\n- Conhecimento em OWASP Top 10\n- Familiaridade com ferramentas de pentest",
        salary_range: "R$ 13.000 - R$ 19.000",
        tags: &["Python", "Linux", "AWS", "Docker", "OAuth 2.0"],
    },
    JobTemplate {
        title: "Backend Developer Java",
        description: "Desenvolvedor backend Java para atuar no desenvolvimento de sistemas de alta performance.",
        requirements: "- 3+ anos com Java e Spring Boot\n- Experiência com microsserviços\n- Familiaridade com Kafka ou RabbitMQ",
        salary_range: "R$ 10.000 - R$ 15.000",
        tags: &["Java", "Spring Boot", "PostgreSQL", "Microservices", "Docker"],
    },
    JobTemplate {
        title: "QA Engineer / SDET",
        description: "Engenheiro de qualidade para desenvolver e manter frameworks de automação de testes.",
        requirements: "- Experiência com automação de testes\n- Conhecimento em Selenium, Cypress ou Playwright\n- Experiência com CI/CD",
        salary_range: "R$ 8.000 - R$ 12.000",
        tags: &["Selenium", "Cypress", "Python", "JavaScript", "API REST"],
    },
    JobTemplate {
        title: "Analista de Infraestrutura (Pausada)",
        description: "Vaga temporariamente pausada para revisão de headcount. Responsável por manutenção de servidores e redes.",
        requirements: "- Experiência com Linux\n- Conhecimento em redes TCP/IP\n- Familiaridade com virtualização",
        salary_range: "R$ 6.000 - R$ 9.000",
        tags: &["Linux", "Nginx", "Docker", "Terraform"],
    },
];

/// Cover letters picked at random for seeded applications.
pub const COVER_LETTERS: &[&str] = &[
    "Tenho grande interesse na vaga e acredito que minha experiência pode contribuir com o time.",
    "Acompanho o trabalho da empresa há algum tempo e gostaria muito de fazer parte dessa equipe.",
    "Busco novos desafios e vejo nesta oportunidade o próximo passo da minha carreira.",
];
