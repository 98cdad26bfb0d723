//! The embedded DDL for the TrustFlow backend.
//!
//! The schema is written to be reapplied safely: tables and indexes use
//! `IF NOT EXISTS`, and policies are dropped before being recreated so a
//! rerun never conflicts with an earlier partial application.

/// Full schema for the `spaces` and `testimonials` tables.
pub const SQL_SCHEMA: &str = r#"
-- Enable UUID extension
CREATE EXTENSION IF NOT EXISTS "uuid-ossp";

-- Drop existing policies first (to avoid conflicts)
DROP POLICY IF EXISTS "Users manage own spaces" ON public.spaces;
DROP POLICY IF EXISTS "Anyone can view spaces" ON public.spaces;
DROP POLICY IF EXISTS "Anyone can submit testimonials" ON public.testimonials;
DROP POLICY IF EXISTS "View testimonials" ON public.testimonials;
DROP POLICY IF EXISTS "Owners manage testimonials" ON public.testimonials;
DROP POLICY IF EXISTS "Owners delete testimonials" ON public.testimonials;

-- Spaces table
CREATE TABLE IF NOT EXISTS public.spaces (
    id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
    owner_id UUID REFERENCES auth.users(id) ON DELETE CASCADE,
    slug TEXT UNIQUE NOT NULL,
    space_name TEXT NOT NULL,
    logo_url TEXT,
    header_title TEXT DEFAULT 'Share your experience',
    custom_message TEXT,
    collect_star_rating BOOLEAN DEFAULT true,
    created_at TIMESTAMPTZ DEFAULT NOW(),
    updated_at TIMESTAMPTZ DEFAULT NOW()
);

-- Testimonials table
CREATE TABLE IF NOT EXISTS public.testimonials (
    id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
    space_id UUID REFERENCES public.spaces(id) ON DELETE CASCADE,
    type TEXT NOT NULL CHECK (type IN ('text', 'video')),
    content TEXT,
    video_url TEXT,
    rating INTEGER CHECK (rating >= 1 AND rating <= 5),
    respondent_name TEXT NOT NULL,
    respondent_email TEXT,
    respondent_photo_url TEXT,
    is_liked BOOLEAN DEFAULT false,
    created_at TIMESTAMPTZ DEFAULT NOW()
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_spaces_owner_id ON public.spaces(owner_id);
CREATE INDEX IF NOT EXISTS idx_spaces_slug ON public.spaces(slug);
CREATE INDEX IF NOT EXISTS idx_testimonials_space_id ON public.testimonials(space_id);
CREATE INDEX IF NOT EXISTS idx_testimonials_is_liked ON public.testimonials(is_liked);

-- Enable RLS
ALTER TABLE public.spaces ENABLE ROW LEVEL SECURITY;
ALTER TABLE public.testimonials ENABLE ROW LEVEL SECURITY;

-- Spaces policies
CREATE POLICY "Users manage own spaces" ON public.spaces
    FOR ALL USING (auth.uid() = owner_id);

CREATE POLICY "Anyone can view spaces" ON public.spaces
    FOR SELECT USING (true);

-- Testimonials policies
CREATE POLICY "Anyone can submit testimonials" ON public.testimonials
    FOR INSERT WITH CHECK (true);

CREATE POLICY "View testimonials" ON public.testimonials
    FOR SELECT USING (true);

CREATE POLICY "Owners manage testimonials" ON public.testimonials
    FOR UPDATE USING (
        EXISTS (SELECT 1 FROM public.spaces WHERE spaces.id = testimonials.space_id AND spaces.owner_id = auth.uid())
    );

CREATE POLICY "Owners delete testimonials" ON public.testimonials
    FOR DELETE USING (
        EXISTS (SELECT 1 FROM public.spaces WHERE spaces.id = testimonials.space_id AND spaces.owner_id = auth.uid())
    );
"#;

/// Split the schema into individual executable statements.
///
/// Comment lines and blank fragments are dropped, so the result contains
/// exactly the statements the database would run. The setup flow sends the
/// whole schema in a single RPC call; this split only feeds logging and
/// sanity checks.
pub fn statements() -> Vec<String> {
    SQL_SCHEMA
        .split(';')
        .map(|fragment| {
            fragment
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}
