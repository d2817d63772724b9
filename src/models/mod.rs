pub mod article;
pub mod blog_post;
pub mod loaders;
pub mod publish;

pub use article::Article;
pub use blog_post::{BlogPost, BlogSearchResponse, RawBlogItem};
pub use loaders::{
    list_article_files, load_all_articles, load_article, load_queue_manifest,
    parse_schedule_time, queue_from_dir,
};
pub use publish::{PublishItem, PublishStatus, PublishStep, Visibility};
