use super::*;
use agora_auth::Acknowledged;
use agora_auth::Auth;
use agora_auth::AuthRepository;
use agora_auth::MaybeAuth;
use agora_core::Fault;
use agora_core::ID;
use agora_core::Unique;
use actix_web::HttpResponse;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

/// GET /api/forums — every forum the caller may read, anonymous readers
/// included.
pub async fn forums(
    db: web::Data<Arc<Client>>,
    auth: MaybeAuth,
) -> Result<HttpResponse, Fault> {
    let roles = auth.role_ids();
    let visible = db
        .forums()
        .await?
        .into_iter()
        .filter(|f| f.readable_by(&roles))
        .collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(visible))
}

/// GET /api/forum/{slug}
pub async fn forum(
    db: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, Fault> {
    let forum = db
        .forum(&path)
        .await?
        .ok_or(Fault::Missing("This forum does not exist!"))?;
    Ok(HttpResponse::Ok().json(forum))
}

/// GET /api/forum/{slug}/threads — the forum together with its threads.
pub async fn forum_threads(
    db: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, Fault> {
    let forum = db
        .forum(&path)
        .await?
        .ok_or(Fault::Missing("This forum does not exist!"))?;
    let threads = db.threads_under(&forum.slug).await?;
    Ok(HttpResponse::Ok().json(ForumThreads { forum, threads }))
}

/// POST /api/forum
pub async fn create_forum(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    body: web::Json<CreateForumRequest>,
) -> Result<HttpResponse, Fault> {
    let body = body.into_inner();
    if !valid_slug(&body.slug) {
        return Err(Fault::Invalid("Invalid forum slug!"));
    }
    if db.forum(&body.slug).await?.is_some() {
        return Err(Fault::Conflict("A forum with this slug already exists!"));
    }
    let forum = Forum {
        slug: body.slug,
        name: body.name,
        description: body.description,
        icon: body.icon,
        readable_role_ids: body.readable_role_ids,
        writable_role_ids: body.writable_role_ids,
    };
    db.insert_forum(&forum).await?;
    log::info!("member {} created forum {}", auth.member().name, forum.slug);
    Ok(HttpResponse::Ok().json(forum))
}

/// PATCH /api/forum/{slug} — partial update. Renaming the slug first
/// repoints every thread under the old slug, then rewrites the forum row.
pub async fn update_forum(
    db: web::Data<Arc<Client>>,
    _auth: Auth,
    path: web::Path<String>,
    body: web::Json<UpdateForumRequest>,
) -> Result<HttpResponse, Fault> {
    let slug = path.into_inner();
    let existing = db
        .forum(&slug)
        .await?
        .ok_or(Fault::Missing("This forum does not exist!"))?;
    let patched = body.into_inner().apply(existing);
    if patched.slug != slug {
        if !valid_slug(&patched.slug) {
            return Err(Fault::Invalid("Invalid forum slug!"));
        }
        if db.forum(&patched.slug).await?.is_some() {
            return Err(Fault::Conflict("A forum with this slug already exists!"));
        }
        // Two statements, not a transaction. A crash here strands the
        // threads on the new slug; retrying the rename repairs it.
        db.retarget_threads(&slug, &patched.slug).await?;
    }
    db.update_forum(&slug, &patched).await?;
    Ok(HttpResponse::Ok().json(patched))
}

/// GET /api/thread/{id} — the thread together with its posts.
pub async fn thread(
    db: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, Fault> {
    let thread = db
        .thread(&path)
        .await?
        .ok_or(Fault::Missing("This thread does not exist!"))?;
    let posts = db.posts_under(&thread.id()).await?;
    Ok(HttpResponse::Ok().json(ThreadPosts { thread, posts }))
}

/// GET /api/thread/{id}/replies — the thread's posts alone.
pub async fn replies(
    db: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, Fault> {
    let thread = db
        .thread(&path)
        .await?
        .ok_or(Fault::Missing("This thread does not exist!"))?;
    Ok(HttpResponse::Ok().json(db.posts_under(&thread.id()).await?))
}

/// POST /api/thread — creates the thread and its seed post, sharing one
/// creation timestamp, then fires the webhook.
pub async fn create_thread(
    db: web::Data<Arc<Client>>,
    notifier: web::Data<Notifier>,
    auth: Auth,
    body: web::Json<CreateThreadRequest>,
) -> Result<HttpResponse, Fault> {
    let body = body.into_inner();
    let author = &auth.member().name;
    if db.forum(&body.parent_forum_id).await?.is_none() {
        return Err(Fault::Missing("No forum exists with this slug!"));
    }
    let thread = Thread {
        id: ID::default(),
        title: body.title,
        parent_forum_id: body.parent_forum_id,
        author_id: author.clone(),
        created_on: chrono::Utc::now(),
        closed: body.closed,
        pinned: body.pinned,
        hidden: body.hidden,
    };
    let mut seed = Post::compose(author, &body.content, thread.id());
    seed.created_on = thread.created_on;
    db.insert_thread(&thread).await?;
    db.insert_post(&seed).await?;
    notifier.notify(Notification::new(
        author,
        Some(&thread.title),
        &seed.content,
    ));
    log::info!("member {} opened thread {}", author, thread.id);
    Ok(HttpResponse::Ok().json(ThreadWithContent {
        thread,
        content: seed.content,
    }))
}

/// GET /api/post/{id}
pub async fn post(
    db: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, Fault> {
    let post = db
        .post(&path)
        .await?
        .ok_or(Fault::Missing("This post does not exist!"))?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/post/{threadId} — reply in an existing thread.
pub async fn create_post(
    db: web::Data<Arc<Client>>,
    notifier: web::Data<Notifier>,
    auth: Auth,
    path: web::Path<String>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, Fault> {
    let author = &auth.member().name;
    let thread = db
        .thread(&path)
        .await?
        .ok_or(Fault::Missing("No thread exists with this ID!"))?;
    let post = Post::compose(author, &body.content, thread.id());
    db.insert_post(&post).await?;
    notifier.notify(Notification::new(author, None, &post.content));
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/post/{id}/like
pub async fn like(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<String>,
) -> Result<HttpResponse, Fault> {
    cast(&db, &path, &auth.member().name, Some(Vote::Like)).await
}

/// POST /api/post/{id}/dislike
pub async fn dislike(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<String>,
) -> Result<HttpResponse, Fault> {
    cast(&db, &path, &auth.member().name, Some(Vote::Dislike)).await
}

/// DELETE /api/post/{id}/like — clears the caller from both sets.
pub async fn unvote(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<String>,
) -> Result<HttpResponse, Fault> {
    cast(&db, &path, &auth.member().name, None).await
}

async fn cast(
    db: &Arc<Client>,
    id: &str,
    member: &str,
    vote: Option<Vote>,
) -> Result<HttpResponse, Fault> {
    let found = match vote {
        Some(vote) => db.vote(id, member, vote).await?,
        None => db.unvote(id, member).await?,
    };
    match found {
        true => Ok(HttpResponse::Ok().json(Acknowledged::of(true))),
        false => Err(Fault::Missing("This post does not exist!")),
    }
}

/// GET /api/members
pub async fn members(db: web::Data<Arc<Client>>) -> Result<HttpResponse, Fault> {
    Ok(HttpResponse::Ok().json(db.members().await?))
}

/// GET /api/member/{name} — `@me` resolves to the caller's own record.
pub async fn member(
    db: web::Data<Arc<Client>>,
    auth: MaybeAuth,
    path: web::Path<String>,
) -> Result<HttpResponse, Fault> {
    let name = path.into_inner();
    if name == "@me" {
        let own = auth
            .0
            .ok_or(Fault::Unauthorized("Invalid access token!"))?;
        return Ok(HttpResponse::Ok().json(own));
    }
    let member = db
        .member(&name)
        .await?
        .ok_or(Fault::Missing("No member with this username exists!"))?;
    Ok(HttpResponse::Ok().json(member))
}
