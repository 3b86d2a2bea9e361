//! Instruction text sent to the chat and image models.

use super::{CopyRequest, HashtagRequest, ImageRequest};
use crate::db::models::{BrandProfile, Platform};

pub const COPY_SYSTEM_PROMPT: &str =
    "Eres un experto en marketing digital especializado en crear contenido para PyMEs.";
pub const HASHTAG_SYSTEM_PROMPT: &str =
    "Eres un experto en marketing digital especializado en hashtags estratégicos para redes sociales.";

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value.trim()
    }
}

/// Profile fields with the fallbacks used when writing instructions
struct BrandBrief<'a> {
    business: &'a str,
    industry: &'a str,
    audience: &'a str,
    tone: &'a str,
    values: &'a str,
    themes: &'a str,
    visual_style: &'a str,
}

impl<'a> BrandBrief<'a> {
    fn from_profile(profile: &'a BrandProfile) -> Self {
        Self {
            business: or(&profile.brand_name, "Marketing Digital para PyMEs"),
            industry: or(&profile.industry, "marketing"),
            audience: or(&profile.target_audience, "Pequeñas y medianas empresas"),
            tone: or(&profile.communication_tone, "profesional"),
            values: or(&profile.brand_values, "innovación, calidad, confianza"),
            themes: or(&profile.content_themes, "marketing digital, tendencias"),
            visual_style: or(&profile.visual_style, "moderno"),
        }
    }
}

pub fn copy_prompt(request: &CopyRequest) -> String {
    let brief = BrandBrief::from_profile(&request.profile);

    match request.platform {
        Platform::Instagram => format!(
            "Escribe una nueva versión de un post de Instagram para una marca del sector {industry}.\n\n\
             Marca:\n\
             - Negocio: {business}\n\
             - Audiencia: {audience}\n\
             - Tono: {tone}\n\
             - Valores: {values}\n\
             - Temas: {themes}\n\
             - Estilo visual: {style}\n\n\
             Título: {title}\n\
             Texto actual: {content}\n\
             Formato: {format:?}\n\n\
             Reglas:\n\
             - Conserva el tema del título\n\
             - Hasta 5 emojis, bien ubicados\n\
             - Cierra con una pregunta que invite a comentar\n\
             - 150 palabras como máximo\n\
             - Aporta valor concreto para PyMEs\n\n\
             Devuelve únicamente el texto del post, sin hashtags ni comentarios.",
            industry = brief.industry,
            business = brief.business,
            audience = brief.audience,
            tone = brief.tone,
            values = brief.values,
            themes = brief.themes,
            style = brief.visual_style,
            title = request.title,
            content = request.content,
            format = request.content_type,
        ),
        Platform::Linkedin => format!(
            "Escribe una nueva versión de un post profesional de LinkedIn.\n\n\
             Cliente:\n\
             - Negocio: {business}\n\
             - Audiencia: {audience}\n\
             - Tono: {tone}\n\n\
             Título: {title}\n\
             Texto actual: {content}\n\n\
             Reglas:\n\
             - Enfoque profesional y coherente con el título\n\
             - Incluye datos o aprendizajes relevantes\n\
             - Termina con una pregunta que abra conversación\n\
             - 200 palabras como máximo, casi sin emojis\n\
             - Orientado al crecimiento empresarial\n\n\
             Devuelve únicamente el texto del post, sin hashtags ni comentarios.",
            business = brief.business,
            audience = brief.audience,
            tone = brief.tone,
            title = request.title,
            content = request.content,
        ),
    }
}

/// Hashtags for freshly regenerated copy
pub fn copy_hashtags_prompt(platform: Platform, new_content: &str) -> String {
    let count = match platform {
        Platform::Instagram => "entre 8 y 10 hashtags, mezclando populares y de nicho",
        Platform::Linkedin => "entre 3 y 5 hashtags profesionales",
    };
    format!(
        "Post para {platform}: \"{new_content}\"\n\n\
         Propón {count} para una marca que trabaja con PyMEs.\n\
         Responde solo con los hashtags separados por espacios, cada uno con #.",
    )
}

pub fn hashtag_prompt(request: &HashtagRequest) -> String {
    let industry = or(&request.industry, "marketing digital");
    let guidance = match request.platform {
        Platform::Instagram => {
            "- Entre 10 y 12 hashtags para Instagram\n\
             - Combina hashtags populares (100K-1M publicaciones) y de nicho (10K-100K)\n\
             - 3-4 de industria, 2-3 de audiencia, 2-3 del tema, 2-3 de comunidad (#pymes #emprendedores)\n\
             - Agrega ubicación (Argentina/LATAM) si aplica\n\
             - Evita genéricos como #love o #instagood"
        }
        Platform::Linkedin => {
            "- Entre 5 y 7 hashtags profesionales para LinkedIn\n\
             - 2-3 de industria, 2-3 empresariales, 1-2 de networking\n\
             - Pensados para tomadores de decisión, nada informal"
        }
    };

    format!(
        "Cliente: Marketing Digital para PyMEs, audiencia Pequeñas y medianas empresas, industria {industry}.\n\n\
         Título: {title}\n\
         Contenido: {content}\n\n\
         {guidance}\n\n\
         Responde solo con los hashtags separados por espacios, cada uno con #.",
        title = request.title,
        content = request.content,
    )
}

pub fn hashtag_analysis_prompt(platform: Platform, hashtags: &str) -> String {
    format!(
        "Evalúa estos hashtags para {platform}: {hashtags}\n\n\
         Responde solo con un objeto JSON con esta forma:\n\
         {{\"reach_potential\": \"Alto|Medio|Bajo\", \"competition_level\": \"Alto|Medio|Bajo\", \
         \"relevance\": \"Alta|Media|Baja\", \"recommendation\": \"una frase\"}}"
    )
}

pub fn image_prompt(request: &ImageRequest) -> String {
    let profile = &request.profile;
    let style = or(&profile.image_style_preferences, "profesional, moderno");
    let visual = or(&profile.visual_style, "moderno");
    let industry = or(&profile.industry, "general");

    format!(
        "Imagen para redes sociales.\n\n\
         Título: {title}\n\
         Contenido: {content}\n\n\
         Estilo: {style}, {visual}\n\
         Industria: {industry}\n\
         Plataforma: {platform}\n\n\
         Requisitos: atractiva y profesional, coherente con el mensaje, optimizada para {platform}, \
         alta resolución y sin texto dentro de la imagen.",
        title = request.title,
        content = request.content,
        platform = request.platform,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ContentType;

    fn copy_request(platform: Platform) -> CopyRequest {
        CopyRequest {
            platform,
            content_type: ContentType::Carousel,
            title: "SEO y SEM".to_string(),
            content: "texto".to_string(),
            profile: BrandProfile {
                brand_name: "Acme".to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_copy_prompt_uses_profile_and_fallbacks() {
        let prompt = copy_prompt(&copy_request(Platform::Instagram));
        assert!(prompt.contains("Negocio: Acme"));
        assert!(prompt.contains("sector marketing"));
        assert!(prompt.contains("Título: SEO y SEM"));
        assert!(prompt.contains("Instagram"));
    }

    #[test]
    fn test_linkedin_copy_prompt_differs() {
        let prompt = copy_prompt(&copy_request(Platform::Linkedin));
        assert!(prompt.contains("LinkedIn"));
        assert!(prompt.contains("200 palabras"));
    }

    #[test]
    fn test_image_prompt_defaults() {
        let request = ImageRequest {
            platform: Platform::Instagram,
            title: "Hola".to_string(),
            content: "Mundo".to_string(),
            profile: BrandProfile {
                image_style_preferences: String::new(),
                visual_style: String::new(),
                ..Default::default()
            },
        };
        let prompt = image_prompt(&request);
        assert!(prompt.contains("Estilo: profesional, moderno, moderno"));
        assert!(prompt.contains("Industria: general"));
        assert!(prompt.contains("Plataforma: instagram"));
    }

    #[test]
    fn test_analysis_prompt_asks_for_json() {
        let prompt = hashtag_analysis_prompt(Platform::Linkedin, "#a #b");
        assert!(prompt.contains("\"reach_potential\""));
        assert!(prompt.contains("#a #b"));
    }
}
