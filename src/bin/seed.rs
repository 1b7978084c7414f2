use campushub::{
    auth::AuthService,
    domain::{Announcement, AnnouncementCategory, Document, DocumentKind, DocumentStatus},
    repository::{
        AdminRepository, AnnouncementRepository, DocumentRepository, SqliteAdminRepository,
        SqliteAnnouncementRepository, SqliteDocumentRepository,
    },
    storage::{BlobStore, LocalBlobStore, DOCUMENTS_BUCKET},
};
use chrono::Utc;
use clap::Parser;
use fake::{faker::lorem::en::Sentence, Fake};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

/// Minimal but valid-enough PDF bytes for local development.
const PLACEHOLDER_PDF: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\ntrailer << /Root 1 0 R >>\n%%EOF\n";

#[derive(Parser)]
#[command(about = "Seed the campushub database with an admin and sample content")]
struct Args {
    /// Database URL (falls back to DATABASE_URL, then a local file)
    #[arg(long)]
    database_url: Option<String>,

    /// Admin username to create
    #[arg(long, default_value = "admin")]
    admin_username: String,

    /// Admin password to create
    #[arg(long, default_value = "admin123")]
    admin_password: String,

    /// Storage root for placeholder blobs
    #[arg(long, default_value = "storage")]
    storage_root: String,

    /// Number of sample documents per kind
    #[arg(long, default_value_t = 4)]
    documents: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:campushub.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let document_repo = SqliteDocumentRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());
    let admin_repo = SqliteAdminRepository::new(db_pool.clone());
    let blob_store = LocalBlobStore::new(args.storage_root.clone(), "http://localhost:8080");

    println!("👤 Creating admin...");
    let password_hash = AuthService::hash_password(&args.admin_password).await?;
    match admin_repo.create(&args.admin_username, &password_hash).await {
        Ok(_) => println!(
            "  ✅ Created admin ({} / {})",
            args.admin_username, args.admin_password
        ),
        Err(e) => println!("  ⚠️ Admin not created (may already exist): {}", e),
    }

    println!("📣 Creating announcements...");
    let announcements = [
        (
            "Welcome to the new semester",
            "Course material and PYQs from previous batches are up. Contributions welcome!",
            AnnouncementCategory::General,
        ),
        (
            "Mid-semester exam schedule released",
            "Check the notice board for your slot. PYQs for all core subjects are available.",
            AnnouncementCategory::Exam,
        ),
        (
            "Placement drive next month",
            "Pre-placement talks start next week. Keep your resumes ready.",
            AnnouncementCategory::Placement,
        ),
    ];
    for (title, content, category) in announcements {
        announcement_repo
            .create(Announcement {
                id: Uuid::new_v4(),
                title: title.to_string(),
                content: content.to_string(),
                category,
                image_path: None,
                is_active: true,
                created_at: Utc::now(),
            })
            .await?;
    }
    println!("  ✅ Created 3 announcements");

    println!("📄 Creating sample documents...");
    let subjects = ["DBMS", "Operating Systems", "Maths-I", "Digital Logic"];
    let semesters = ["1st Year", "2nd Year", "3rd Year", "4th Year"];
    let mut created = 0usize;

    for kind in [DocumentKind::Pyq, DocumentKind::Assignment] {
        for i in 0..args.documents {
            let id = Uuid::new_v4();
            let file_path = format!("{}-sample.pdf", id);
            blob_store
                .put(DOCUMENTS_BUCKET, &file_path, PLACEHOLDER_PDF)
                .await?;

            let title: String = Sentence(2..5).fake();
            let now = Utc::now();
            // Leave the last document of each kind pending so the
            // moderation console has something to review.
            let status = if i + 1 == args.documents {
                DocumentStatus::Pending
            } else {
                DocumentStatus::Approved
            };

            document_repo
                .create(Document {
                    id,
                    title: title.trim_end_matches('.').to_string(),
                    subject: subjects[i % subjects.len()].to_string(),
                    semester: semesters[i % semesters.len()].to_string(),
                    kind,
                    file_path,
                    status,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
            created += 1;
        }
    }
    println!("  ✅ Created {} documents (one pending per kind)", created);

    println!("🎉 Seeding complete");
    Ok(())
}
