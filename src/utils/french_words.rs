//! 内置法语词表，用于生成易读的班级加入码

pub const FRENCH_WORDS: &[&str] = &[
    "abeille", "abri", "accord", "agneau", "aigle", "aile", "air", "album", "amande", "ami",
    "ananas", "ancre", "ange", "anneau", "arbre", "arc", "argent", "armoire", "astre", "atelier",
    "avion", "balle", "bambou", "banane", "bateau", "berger", "biche", "bijou", "blanc", "bleu",
    "bois", "bonbon", "bougie", "bouton", "branche", "brise", "bulle", "cabane", "cactus", "cadeau",
    "campagne", "canard", "canot", "carotte", "castor", "cerise", "chalet", "chameau", "chanson",
    "chapeau", "chat", "chemin", "cheval", "chien", "ciel", "citron", "clair", "cloche", "coin",
    "colline", "comete", "copain", "corde", "coton", "coucou", "crayon", "cygne", "dauphin",
    "dessin", "domino", "dragon", "eau", "echelle", "eclair", "ecureuil", "etoile", "falaise",
    "farine", "fenetre", "feuille", "flamme", "fleur", "flocon", "foret", "fraise", "fromage",
    "fusee", "galet", "gateau", "girafe", "glace", "grain", "grenier", "griffon", "guitare",
    "hibou", "horloge", "ile", "jardin", "jaune", "jouet", "jungle", "kiwi", "lac", "lapin",
    "lavande", "livre", "loup", "lumiere", "lune", "lutin", "maison", "marmotte", "melon", "merle",
    "miel", "montagne", "mouton", "musique", "nuage", "ocean", "olive", "orange", "ours", "page",
    "palmier", "panda", "papillon", "parc", "pelican", "perle", "phare", "piano", "pierre",
    "pinceau", "planete", "plume", "poisson", "pomme", "prairie", "prune", "radis", "raisin",
    "renard", "riviere", "robot", "rocher", "rose", "ruche", "sable", "sapin", "saumon", "soleil",
    "source", "sucre", "tambour", "tigre", "tomate", "tortue", "tresor", "tulipe", "vague",
    "valise", "vent", "verger", "village", "violon", "voile", "zebre",
];
